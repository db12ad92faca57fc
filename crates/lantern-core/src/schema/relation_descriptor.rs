use std::fmt;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RelationType {
    BelongsTo,
    HasOne,
    HasMany,
    BelongsToMany,
    MorphTo,
    MorphMany,
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RelationType::BelongsTo => "belongsTo",
            RelationType::HasOne => "hasOne",
            RelationType::HasMany => "hasMany",
            RelationType::BelongsToMany => "belongsToMany",
            RelationType::MorphTo => "morphTo",
            RelationType::MorphMany => "morphMany",
        })
    }
}

/// How a field's records are found from its parent record.
///
/// The role-specific keys are `None` for relation types that do not use
/// them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RelationDescriptor {
    pub relation_type: RelationType,
    pub name: String,
    /// Element type of the field; the type records are loaded as.
    pub target_type: String,
    pub foreign_key: String,
    pub reference: String,

    pub pivot: Option<String>,
    pub pivot_foreign_key: Option<String>,
    pub pivot_reference: Option<String>,
    pub relation_foreign_key: Option<String>,

    pub morph_key: Option<String>,
    pub morph_type: Option<String>,
    pub current_type: Option<String>,
}

impl RelationDescriptor {
    pub fn new(
        relation_type: RelationType,
        name: impl Into<String>,
        target_type: impl Into<String>,
    ) -> Self {
        Self {
            relation_type,
            name: name.into(),
            target_type: target_type.into(),
            foreign_key: String::new(),
            reference: "id".to_string(),
            pivot: None,
            pivot_foreign_key: None,
            pivot_reference: None,
            relation_foreign_key: None,
            morph_key: None,
            morph_type: None,
            current_type: None,
        }
    }
}
