use std::path::PathBuf;

use thiserror::Error;

use crate::activation::CableId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("cable {0} is not in the activation graph")]
    UnknownNode(CableId),
    #[error("cable {0} cannot extend itself")]
    SelfEdge(CableId),
    #[error("linking {upstream} into {node} would create a cycle")]
    Cycle { node: CableId, upstream: CableId },
    #[error("cable {0} derives its state from a combinator and cannot be set directly")]
    NotSettable(CableId),
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scene {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed scene file")]
    Json(#[from] serde_json::Error),
    #[error("unknown cable `{0}`")]
    UnknownCable(String),
    #[error("duplicate cable name `{0}`")]
    DuplicateCable(String),
    #[error(transparent)]
    Graph(#[from] GraphError),
}
