/// Memory graph invariant breaches.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("relation would loop {entity_id} onto itself")]
    SelfLoop { entity_id: String },

    #[error("entity {entity_id} is not in subject {subject_id}'s graph")]
    EndpointMissing {
        subject_id: String,
        entity_id: String,
    },

    #[error("entity {entity_id} belongs to subject {owner}, not {subject_id}")]
    ForeignEntity {
        entity_id: String,
        owner: String,
        subject_id: String,
    },

    #[error("subject {subject_id} is a caregiver and has no memory graph")]
    NoGraphForSubject { subject_id: String },
}
