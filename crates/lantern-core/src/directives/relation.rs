use crate::directives::ParentInfo;
use crate::error::ValidateError;
use crate::naming::able;
use crate::naming::lc_first;
use crate::naming::snake_case;
use crate::schema::FieldDescriptor;
use crate::schema::NodeStore;
use crate::schema::RelationDescriptor;
use crate::schema::RelationType;
use lantern_parser::ast::DirectiveAnnotation;

/// An explicit key argument, normalized to snake case.
fn explicit(directive: &DirectiveAnnotation, name: &str) -> Option<String> {
    directive.string_argument(name).map(snake_case)
}

fn owner_key(parent: &ParentInfo<'_>) -> String {
    format!("{}_id", snake_case(parent.type_name))
}

pub(super) fn belongs_to(
    field: &mut FieldDescriptor,
    directive: &DirectiveAnnotation,
    _store: &mut NodeStore,
    _parent: &ParentInfo<'_>,
) -> Result<(), ValidateError> {
    let name = explicit(directive, "relation").unwrap_or_else(|| lc_first(&field.name));
    let mut relation =
        RelationDescriptor::new(RelationType::BelongsTo, name, field.type_ref.name());
    relation.foreign_key = explicit(directive, "foreignKey")
        .unwrap_or_else(|| format!("{}_id", snake_case(&lc_first(&field.name))));
    relation.reference = explicit(directive, "reference").unwrap_or_else(|| "id".to_string());
    field.relation = Some(relation);
    Ok(())
}

pub(super) fn has_one(
    field: &mut FieldDescriptor,
    directive: &DirectiveAnnotation,
    _store: &mut NodeStore,
    parent: &ParentInfo<'_>,
) -> Result<(), ValidateError> {
    let name = explicit(directive, "relation").unwrap_or_else(|| lc_first(&field.name));
    let mut relation = RelationDescriptor::new(RelationType::HasOne, name, field.type_ref.name());
    relation.foreign_key = explicit(directive, "foreignKey").unwrap_or_else(|| owner_key(parent));
    relation.reference = explicit(directive, "reference").unwrap_or_else(|| "id".to_string());
    field.relation = Some(relation);
    Ok(())
}

pub(super) fn has_many(
    field: &mut FieldDescriptor,
    directive: &DirectiveAnnotation,
    _store: &mut NodeStore,
    parent: &ParentInfo<'_>,
) -> Result<(), ValidateError> {
    let target = field.type_ref.name().to_string();
    let name = explicit(directive, "relation").unwrap_or_else(|| snake_case(&target));
    let mut relation = RelationDescriptor::new(RelationType::HasMany, name, target);
    relation.foreign_key = explicit(directive, "foreignKey").unwrap_or_else(|| owner_key(parent));
    relation.reference = explicit(directive, "reference").unwrap_or_else(|| "id".to_string());
    field.relation = Some(relation);
    Ok(())
}

/// Fills the pivot keys of a many-to-many relation between the parent type
/// and `relation.target_type`, keeping any the directive set.
fn pivot_defaults(
    relation: &mut RelationDescriptor,
    directive: &DirectiveAnnotation,
    parent: &ParentInfo<'_>,
) {
    let owner = snake_case(parent.type_name);
    let target = snake_case(&relation.target_type);
    relation.pivot =
        Some(explicit(directive, "pivot").unwrap_or_else(|| format!("{owner}_{target}")));
    relation.pivot_foreign_key =
        Some(explicit(directive, "pivotForeignKey").unwrap_or_else(|| format!("{owner}_id")));
    relation.pivot_reference =
        Some(explicit(directive, "pivotReference").unwrap_or_else(|| format!("{target}_id")));
    relation.relation_foreign_key =
        Some(explicit(directive, "relationForeignKey").unwrap_or_else(|| "id".to_string()));
}

pub(super) fn belongs_to_many(
    field: &mut FieldDescriptor,
    directive: &DirectiveAnnotation,
    _store: &mut NodeStore,
    parent: &ParentInfo<'_>,
) -> Result<(), ValidateError> {
    let name = explicit(directive, "relation").unwrap_or_else(|| lc_first(&field.name));
    let mut relation =
        RelationDescriptor::new(RelationType::BelongsToMany, name, field.type_ref.name());
    relation.foreign_key = explicit(directive, "foreignKey").unwrap_or_else(|| owner_key(parent));
    relation.reference = explicit(directive, "reference").unwrap_or_else(|| "id".to_string());
    pivot_defaults(&mut relation, directive, parent);
    field.relation = Some(relation);
    Ok(())
}

pub(super) fn many_to_many(
    field: &mut FieldDescriptor,
    directive: &DirectiveAnnotation,
    _store: &mut NodeStore,
    parent: &ParentInfo<'_>,
) -> Result<(), ValidateError> {
    let Some(name) = explicit(directive, "relation") else {
        return Err(ValidateError::new(
            format!("{}.{}", parent.type_name, field.name),
            "relation argument is required for @manyToMany directive",
        ));
    };
    let mut relation =
        RelationDescriptor::new(RelationType::BelongsToMany, name, field.type_ref.name());
    relation.foreign_key = explicit(directive, "foreignKey").unwrap_or_else(|| "id".to_string());
    pivot_defaults(&mut relation, directive, parent);
    field.relation = Some(relation);
    Ok(())
}

pub(super) fn morph_to(
    field: &mut FieldDescriptor,
    directive: &DirectiveAnnotation,
    _store: &mut NodeStore,
    _parent: &ParentInfo<'_>,
) -> Result<(), ValidateError> {
    let base = snake_case(&field.name);
    let mut relation =
        RelationDescriptor::new(RelationType::MorphTo, lc_first(&field.name), field.type_ref.name());
    relation.morph_type =
        Some(explicit(directive, "morphType").unwrap_or_else(|| format!("{base}_type")));
    relation.morph_key =
        Some(explicit(directive, "morphKey").unwrap_or_else(|| format!("{base}_id")));
    relation.reference = explicit(directive, "reference").unwrap_or_else(|| "id".to_string());
    field.relation = Some(relation);
    Ok(())
}

pub(super) fn morph_to_many(
    field: &mut FieldDescriptor,
    directive: &DirectiveAnnotation,
    _store: &mut NodeStore,
    parent: &ParentInfo<'_>,
) -> Result<(), ValidateError> {
    let target = field.type_ref.name().to_string();
    let name = directive
        .string_argument("relation")
        .map(str::to_string)
        .unwrap_or_else(|| lc_first(&able(&target)));
    let base = snake_case(&name);
    let mut relation = RelationDescriptor::new(RelationType::MorphMany, name, target);
    relation.current_type =
        Some(explicit(directive, "currentType").unwrap_or_else(|| snake_case(parent.type_name)));
    relation.morph_type =
        Some(explicit(directive, "morphType").unwrap_or_else(|| format!("{base}_type")));
    relation.morph_key =
        Some(explicit(directive, "morphKey").unwrap_or_else(|| format!("{base}_id")));
    relation.reference = explicit(directive, "reference").unwrap_or_else(|| "id".to_string());
    field.relation = Some(relation);
    Ok(())
}
