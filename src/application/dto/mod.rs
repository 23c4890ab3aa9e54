use uuid::Uuid;

pub mod posts;
pub mod tags;

/// Identifier of a row removed by a delete operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletedDto {
    pub id: Uuid,
}
