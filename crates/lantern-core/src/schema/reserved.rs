//! Definitions every schema gets unless it defines the same names itself.

pub(crate) const RESERVED_SDL: &str = r#"
scalar ID
scalar String
scalar Int
scalar Float
scalar Boolean
"RFC 3339 date and time"
scalar DateTime

enum SortOrder {
  ASC @enum(value: 1)
  DESC @enum(value: -1)
}

type PaginateInfo {
  currentPage: Int!
  totalPage: Int!
  hasNextPage: Boolean!
  totalCount: Int!
}

"Skips the field or fragment when `if` is true."
directive @skip(if: Boolean!) on FIELD | FRAGMENT_SPREAD | INLINE_FRAGMENT
"Includes the field or fragment only when `if` is true."
directive @include(if: Boolean!) on FIELD | FRAGMENT_SPREAD | INLINE_FRAGMENT
directive @deprecated(reason: String) on FIELD_DEFINITION | ARGUMENT_DEFINITION | INPUT_FIELD_DEFINITION | ENUM_VALUE
"Storage code of an enum value."
directive @enum(value: Int!) on ENUM_VALUE

directive @belongsTo(relation: String, foreignKey: String, reference: String) on FIELD_DEFINITION
directive @hasOne(relation: String, foreignKey: String, reference: String) on FIELD_DEFINITION
directive @hasMany(relation: String, foreignKey: String, reference: String) on FIELD_DEFINITION
directive @belongsToMany(relation: String, foreignKey: String, reference: String) on FIELD_DEFINITION
directive @manyToMany(
  relation: String
  pivot: String
  foreignKey: String
  pivotForeignKey: String
  pivotReference: String
  relationForeignKey: String
) on FIELD_DEFINITION
directive @morphTo(morphType: String, morphKey: String, reference: String) on FIELD_DEFINITION
directive @morphToMany(
  relation: String
  morphType: String
  morphKey: String
  reference: String
  currentType: String
) on FIELD_DEFINITION

directive @find(scopes: [String!]) on FIELD_DEFINITION
directive @first(scopes: [String!]) on FIELD_DEFINITION
directive @paginate(scopes: [String!], sortBy: String) on FIELD_DEFINITION

directive @eq(field: String) on ARGUMENT_DEFINITION
directive @neq(field: String) on ARGUMENT_DEFINITION
directive @gt(field: String) on ARGUMENT_DEFINITION
directive @gte(field: String) on ARGUMENT_DEFINITION
directive @lt(field: String) on ARGUMENT_DEFINITION
directive @lte(field: String) on ARGUMENT_DEFINITION
directive @in(field: String) on ARGUMENT_DEFINITION
directive @notIn(field: String) on ARGUMENT_DEFINITION
directive @like(field: String) on ARGUMENT_DEFINITION

directive @extends on OBJECT
directive @scopes(names: [String!]!) on OBJECT
directive @model(name: String) on OBJECT
directive @softDeleteModel(name: String) on OBJECT
directive @searchable on FIELD_DEFINITION
directive @attr on FIELD_DEFINITION

directive @auth(msg: String) on FIELD_DEFINITION
directive @cache(ttl: Int, tags: [String!], auth: Boolean) on FIELD_DEFINITION

type __Schema {
  description: String
  types: [__Type!]!
  queryType: __Type!
  mutationType: __Type
  subscriptionType: __Type
  directives: [__Directive!]!
}

type __Type {
  kind: __TypeKind!
  name: String
  description: String
  fields(includeDeprecated: Boolean = false): [__Field!]
  interfaces: [__Type!]
  possibleTypes: [__Type!]
  enumValues(includeDeprecated: Boolean = false): [__EnumValue!]
  inputFields: [__InputValue!]
  ofType: __Type
}

type __Field {
  name: String!
  description: String
  args: [__InputValue!]!
  type: __Type!
  isDeprecated: Boolean!
  deprecationReason: String
}

type __InputValue {
  name: String!
  description: String
  type: __Type!
  defaultValue: String
}

type __EnumValue {
  name: String!
  description: String
  isDeprecated: Boolean!
  deprecationReason: String
}

type __Directive {
  name: String!
  description: String
  locations: [__DirectiveLocation!]!
  args: [__InputValue!]!
  isRepeatable: Boolean!
}

enum __TypeKind {
  SCALAR
  OBJECT
  INTERFACE
  UNION
  ENUM
  INPUT_OBJECT
  LIST
  NON_NULL
}

enum __DirectiveLocation {
  QUERY
  MUTATION
  SUBSCRIPTION
  FIELD
  FRAGMENT_DEFINITION
  FRAGMENT_SPREAD
  INLINE_FRAGMENT
  VARIABLE_DEFINITION
  SCHEMA
  SCALAR
  OBJECT
  FIELD_DEFINITION
  ARGUMENT_DEFINITION
  INTERFACE
  UNION
  ENUM
  ENUM_VALUE
  INPUT_OBJECT
  INPUT_FIELD_DEFINITION
}
"#;
