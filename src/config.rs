//! Diagnostic configuration for a pipeline run.
//!
//! Pipelines are assembled in code via [`crate::pipeline::Pipeline::connect`] /
//! `connect_owned`; this module holds no file or wire format, only the small set of options that
//! shape thread/log naming.

/// Options controlling diagnostic naming. Never describes pipeline topology.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Prefix used when naming stage threads and tagging `tracing` events, e.g. `"stage-0"`.
    pub stage_name_prefix: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            stage_name_prefix: "stage".to_string(),
        }
    }
}
