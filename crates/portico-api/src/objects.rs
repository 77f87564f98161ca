// Generic addressing for Data Plane configuration objects.
//
// Backends, servers, frontends and binds share one CRUD shape. The only
// thing that varies is where the collection lives: backends and frontends
// are top-level, servers and binds are nested under a named parent. Each
// model type declares its kind, and the client builds paths from that.

use serde::Serialize;
use serde::de::DeserializeOwned;
use strum::{Display, EnumIter, IntoStaticStr};

use crate::error::Error;

/// The four configuration object kinds the reconciler manages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, IntoStaticStr, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum ObjectKind {
    Backend,
    Server,
    Frontend,
    Bind,
}

impl ObjectKind {
    /// Collection segment under `configuration/`.
    pub fn collection(self) -> &'static str {
        match self {
            Self::Backend => "backends",
            Self::Server => "servers",
            Self::Frontend => "frontends",
            Self::Bind => "binds",
        }
    }

    /// The kind this one is nested under, if any.
    pub fn parent(self) -> Option<Self> {
        match self {
            Self::Backend | Self::Frontend => None,
            Self::Server => Some(Self::Backend),
            Self::Bind => Some(Self::Frontend),
        }
    }

    /// Path segments (relative to the service root) of this kind's
    /// collection within `scope`.
    ///
    /// `configuration/backends`, `configuration/backends/{b}/servers`, ...
    pub fn collection_segments(self, scope: Scope<'_>) -> Result<Vec<String>, Error> {
        let mut segments = vec!["configuration".to_owned()];
        match (self.parent(), scope) {
            (None, Scope::Root) => {}
            (Some(parent), Scope::Parent(name)) => {
                segments.push(parent.collection().to_owned());
                segments.push(name.to_owned());
            }
            (Some(parent), Scope::Root) => {
                return Err(Error::MissingParent { kind: self, parent });
            }
            (None, Scope::Parent(name)) => {
                return Err(Error::UnexpectedParent {
                    kind: self,
                    parent: name.to_owned(),
                });
            }
        }
        segments.push(self.collection().to_owned());
        Ok(segments)
    }
}

/// Where an object lives: at the configuration root, or under a named parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope<'a> {
    Root,
    Parent(&'a str),
}

/// A configuration object the generic client can list, get, create and delete.
pub trait ConfigObject: Serialize + DeserializeOwned + Send + Sync {
    const KIND: ObjectKind;

    /// The object's unique name within its collection.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn top_level_collections() {
        assert_eq!(
            ObjectKind::Backend
                .collection_segments(Scope::Root)
                .unwrap_or_default(),
            vec!["configuration", "backends"]
        );
        assert_eq!(
            ObjectKind::Frontend
                .collection_segments(Scope::Root)
                .unwrap_or_default(),
            vec!["configuration", "frontends"]
        );
    }

    #[test]
    fn nested_collections() {
        assert_eq!(
            ObjectKind::Bind
                .collection_segments(Scope::Parent("fe-1"))
                .unwrap_or_default(),
            vec!["configuration", "frontends", "fe-1", "binds"]
        );
        assert_eq!(
            ObjectKind::Server
                .collection_segments(Scope::Parent("be-1"))
                .unwrap_or_default(),
            vec!["configuration", "backends", "be-1", "servers"]
        );
    }

    #[test]
    fn scope_mismatch_is_rejected() {
        assert!(matches!(
            ObjectKind::Server.collection_segments(Scope::Root),
            Err(Error::MissingParent {
                kind: ObjectKind::Server,
                parent: ObjectKind::Backend
            })
        ));
        assert!(matches!(
            ObjectKind::Frontend.collection_segments(Scope::Parent("x")),
            Err(Error::UnexpectedParent { .. })
        ));
    }

    #[test]
    fn every_nested_kind_has_a_top_level_parent() {
        for kind in ObjectKind::iter() {
            if let Some(parent) = kind.parent() {
                assert_eq!(parent.parent(), None, "{kind} nests too deep");
            }
        }
    }
}
