use patterns::TemplateError;
use thiserror::Error;

#[derive(Debug, Error)]
/// Failure that aborts a rewrite run.
pub enum RewriteError {
    #[error("{unit}: {source}")]
    Template {
        unit: String,
        #[source]
        source: TemplateError,
    },
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
