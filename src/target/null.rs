use super::{FluxTarget, TargetKind};

/// Discards every coefficient.
///
/// Used when only one side of a flux is wanted, or to time the kernel
/// without deposit cost. The kernel still issues every call, so work done
/// with a null target matches work done with a real one minus the stores.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NullTarget;

impl NullTarget {
    pub fn new() -> Self {
        NullTarget
    }
}

impl FluxTarget for NullTarget {
    const KIND: TargetKind = TargetKind::Null;

    #[inline]
    fn extent(&self) -> Option<(usize, usize)> {
        None
    }

    #[inline(always)]
    fn add_coefficient(&mut self, _row: usize, _col: usize, _value: f64) {}
}
