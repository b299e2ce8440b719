//! Human-readable rendering of a [`Program`], used by `--emit-ir`.

use std::fmt;

use super::{OpKind, Program};

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (_, kind) in self.iter() {
            writeln!(f, "{kind}")?;
        }
        Ok(())
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            OpKind::PtrAdd(n) => write!(f, "ptr_add {n}"),
            OpKind::PtrSub(n) => write!(f, "ptr_sub {n}"),
            OpKind::ValAdd(n) => write!(f, "val_add {n}"),
            OpKind::ValSub(n) => write!(f, "val_sub {n}"),
            OpKind::Output => write!(f, "output"),
            OpKind::Input => write!(f, "input"),
            OpKind::LoopStart(id) => write!(f, "loop_start #{id}"),
            OpKind::LoopEnd(id) => write!(f, "loop_end #{id}"),
            OpKind::SetZero => write!(f, "set_zero"),
            OpKind::SetVal(v) => write!(f, "set_val {v}"),
            OpKind::AddMul { factor, offset } => {
                write!(f, "add_mul factor={factor} offset={offset}")
            }
            OpKind::MoveVal { offset } => write!(f, "move_val offset={offset}"),
            OpKind::ScanZero(step) => write!(f, "scan_zero step={step}"),
            OpKind::ScanNonzero(step) => write!(f, "scan_nonzero step={step}"),
            OpKind::Conditional => write!(f, "conditional"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_one_op_per_line() {
        let mut p = Program::new();
        p.push_back(OpKind::PtrAdd(2));
        p.push_back(OpKind::SetZero);
        assert_eq!(p.to_string(), "ptr_add 2\nset_zero\n");
    }
}
