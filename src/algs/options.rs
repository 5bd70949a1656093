//! Evaluation options for the flux kernel.

/// Which geometric scale multiplies the local matrix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FluxMode {
    /// Scale by the face jacobian: the local matrix is a face mass matrix.
    #[default]
    Mass,
    /// Scale by face jacobian over element jacobian: the local matrix is a
    /// reference lift matrix and the result is ready for the inverse mass.
    Lift,
}

/// Knobs for [`perform_flux_detailed`](crate::algs::perform_flux::perform_flux_detailed).
///
/// Deserializable so drivers can keep it next to their other run settings;
/// missing fields take their defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FluxOptions {
    pub mode: FluxMode,
    /// Reject NaN/inf coefficients from the flux class as computation failures.
    pub check_finite: bool,
    /// Faces per worker chunk in parallel evaluation.
    pub chunk_size: usize,
}

impl Default for FluxOptions {
    fn default() -> Self {
        Self {
            mode: FluxMode::Mass,
            check_finite: true,
            chunk_size: 256,
        }
    }
}

impl FluxOptions {
    pub fn with_mode(mut self, mode: FluxMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_check_finite(mut self, check_finite: bool) -> Self {
        self.check_finite = check_finite;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_uses_defaults() {
        let opts: FluxOptions = serde_json::from_str(r#"{"mode":"lift"}"#).unwrap();
        assert_eq!(opts.mode, FluxMode::Lift);
        assert!(opts.check_finite);
        assert_eq!(opts.chunk_size, 256);
    }
}
