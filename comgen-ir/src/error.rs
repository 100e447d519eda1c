use thiserror::Error;

/// Fatal conditions that abort a compilation pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("unknown class {class}")]
    UnknownClass { class: String },
    #[error("unknown module '{module}' in route {route}")]
    UnknownModule { module: String, route: String },
}
