//! Control flags carried by the execution state.

bitflags::bitflags! {
    /// The four evaluation flags.
    ///
    /// `ERROR` and `RETURN` halt every enclosing block loop. `FAILURE` marks
    /// a structured, inspectable failure in the current result and does not
    /// stop anything by itself. `SKIP` suppresses storing a computed result.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ControlFlags: u8 {
        const ERROR = 1;
        const FAILURE = 1 << 1;
        const RETURN = 1 << 2;
        const SKIP = 1 << 3;
    }
}

impl ControlFlags {
    /// Whether block evaluation must stop after the current expression.
    #[inline]
    pub fn halts(self) -> bool {
        self.intersects(ControlFlags::ERROR | ControlFlags::RETURN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_halts_on_error_or_return_only() {
        assert!(ControlFlags::ERROR.halts());
        assert!(ControlFlags::RETURN.halts());
        assert!((ControlFlags::FAILURE | ControlFlags::ERROR).halts());
        assert!(!ControlFlags::FAILURE.halts());
        assert!(!ControlFlags::SKIP.halts());
        assert!(!ControlFlags::empty().halts());
    }
}
