//! AArch64-only JIT executor: maps the emitted code buffer into an
//! executable page, walks the platform's W^X write-gate, invalidates
//! the instruction cache, and calls the result with a fresh tape.
//!
//! Everything here is a runtime capability check, not a second
//! codegen backend — on a non-AArch64 host `run` fails fast with
//! [`CompileError::JitUnavailable`] rather than attempting to lower
//! the IR for some other architecture.

use std::os::raw::c_void;

use crate::codegen::CodeBuffer;
use crate::error::CompileError;
use crate::interp::TAPE_SIZE;

#[cfg(target_os = "macos")]
extern "C" {
    fn pthread_jit_write_protect_np(enabled: libc::c_int);
    fn sys_icache_invalidate(start: *const c_void, len: usize);
}

#[cfg(all(target_os = "linux", target_arch = "aarch64"))]
extern "C" {
    fn __clear_cache(start: *mut c_void, end: *mut c_void);
}

type EntryFn = unsafe extern "C" fn(*mut u8) -> i64;

/// Maps `code`, runs it against a zeroed tape, and returns the entry
/// function's result. The tape is a plain heap allocation, not mapped
/// executable — only the code buffer needs the W^X dance.
#[cfg(target_arch = "aarch64")]
pub fn run(code: &CodeBuffer) -> Result<i64, CompileError> {
    let bytes = code.to_bytes();
    let page = page_size();
    let map_len = round_up(bytes.len().max(1), page);

    let region = JitRegion::allocate(map_len)?;
    region.write(&bytes)?;
    region.make_executable();
    invalidate_icache(region.ptr, map_len);

    let mut tape = vec![0u8; TAPE_SIZE];
    let entry: EntryFn = unsafe { std::mem::transmute(region.ptr) };
    let result = unsafe { entry(tape.as_mut_ptr()) };
    Ok(result)
}

#[cfg(not(target_arch = "aarch64"))]
pub fn run(_code: &CodeBuffer) -> Result<i64, CompileError> {
    Err(CompileError::JitUnavailable(
        "JIT execution requires an AArch64 host",
    ))
}

struct JitRegion {
    ptr: *mut c_void,
    len: usize,
}

impl JitRegion {
    #[cfg(target_arch = "aarch64")]
    fn allocate(len: usize) -> Result<Self, CompileError> {
        let flags = base_map_flags();
        let ptr = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                len,
                libc::PROT_READ | libc::PROT_WRITE,
                flags,
                -1,
                0,
            )
        };
        if ptr == libc::MAP_FAILED {
            return Err(CompileError::JitUnavailable("mmap of executable page failed"));
        }
        Ok(Self { ptr, len })
    }

    #[cfg(target_arch = "aarch64")]
    fn write(&self, bytes: &[u8]) -> Result<(), CompileError> {
        begin_write();
        unsafe {
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), self.ptr as *mut u8, bytes.len());
        }
        end_write();
        Ok(())
    }

    #[cfg(target_arch = "aarch64")]
    fn make_executable(&self) {
        #[cfg(not(target_os = "macos"))]
        unsafe {
            libc::mprotect(self.ptr, self.len, libc::PROT_READ | libc::PROT_EXEC);
        }
        // On Apple platforms MAP_JIT pages are always RWX-capable; the
        // write-gate toggle around `write` already switched us back to
        // executable, so there is nothing further to do here.
    }
}

impl Drop for JitRegion {
    fn drop(&mut self) {
        unsafe {
            libc::munmap(self.ptr, self.len);
        }
    }
}

#[cfg(all(target_arch = "aarch64", target_os = "macos"))]
fn base_map_flags() -> libc::c_int {
    libc::MAP_PRIVATE | libc::MAP_ANON | libc::MAP_JIT
}

#[cfg(all(target_arch = "aarch64", not(target_os = "macos")))]
fn base_map_flags() -> libc::c_int {
    libc::MAP_PRIVATE | libc::MAP_ANON
}

#[cfg(all(target_arch = "aarch64", target_os = "macos"))]
fn begin_write() {
    unsafe { pthread_jit_write_protect_np(0) };
}

#[cfg(all(target_arch = "aarch64", target_os = "macos"))]
fn end_write() {
    unsafe { pthread_jit_write_protect_np(1) };
}

#[cfg(all(target_arch = "aarch64", not(target_os = "macos")))]
fn begin_write() {}

#[cfg(all(target_arch = "aarch64", not(target_os = "macos")))]
fn end_write() {}

#[cfg(all(target_arch = "aarch64", target_os = "macos"))]
fn invalidate_icache(ptr: *mut c_void, len: usize) {
    unsafe { sys_icache_invalidate(ptr, len) };
}

#[cfg(all(target_arch = "aarch64", target_os = "linux"))]
fn invalidate_icache(ptr: *mut c_void, len: usize) {
    unsafe {
        let start = ptr;
        let end = (ptr as usize + len) as *mut c_void;
        __clear_cache(start, end);
    }
}

#[cfg(all(
    target_arch = "aarch64",
    not(any(target_os = "macos", target_os = "linux"))
))]
fn invalidate_icache(_ptr: *mut c_void, _len: usize) {}

#[cfg(target_arch = "aarch64")]
fn page_size() -> usize {
    unsafe { libc::sysconf(libc::_SC_PAGESIZE) as usize }
}

#[cfg(target_arch = "aarch64")]
fn round_up(value: usize, multiple: usize) -> usize {
    (value + multiple - 1) / multiple * multiple
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Program;

    #[test]
    #[cfg(not(target_arch = "aarch64"))]
    fn non_aarch64_host_reports_unavailable() {
        let code = crate::codegen::emit(&Program::new());
        assert!(matches!(run(&code), Err(CompileError::JitUnavailable(_))));
    }
}
