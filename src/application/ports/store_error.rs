use uuid::Uuid;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("invalid {entity} id {value:?}")]
    InvalidId { entity: &'static str, value: String },
    #[error("{entity} {id} not found during {op}")]
    NotFound {
        entity: &'static str,
        op: &'static str,
        id: Uuid,
    },
    #[error("{op} failed{}", id_suffix(.id))]
    Persistence {
        op: &'static str,
        id: Option<Uuid>,
        #[source]
        source: anyhow::Error,
    },
}

impl StoreError {
    pub fn not_found(entity: &'static str, op: &'static str, id: Uuid) -> Self {
        StoreError::NotFound { entity, op, id }
    }

    /// Adapter for `map_err`: `.map_err(StoreError::persistence("tag.create"))`.
    pub fn persistence<E>(op: &'static str) -> impl FnOnce(E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        move |e| StoreError::Persistence {
            op,
            id: None,
            source: e.into(),
        }
    }

    /// Like [`StoreError::persistence`], for operations scoped to one row.
    pub fn persistence_for<E>(op: &'static str, id: Uuid) -> impl FnOnce(E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        move |e| StoreError::Persistence {
            op,
            id: Some(id),
            source: e.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

fn id_suffix(id: &Option<Uuid>) -> String {
    id.map(|id| format!(" for {id}")).unwrap_or_default()
}

/// Parses a caller-supplied identifier; malformed input is a validation
/// failure, reported before any store is touched.
pub fn parse_id(entity: &'static str, raw: &str) -> StoreResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| StoreError::InvalidId {
        entity,
        value: raw.to_string(),
    })
}
