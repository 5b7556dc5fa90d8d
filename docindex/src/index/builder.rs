use crate::errors::DocIndexResult;
use crate::index::{IndexDirective, IndexField, IndexModel};
use crate::schema::SchemaDescriptor;
use indexmap::IndexMap;

/// Builds the set of index models a record type asks for.
///
/// The builder receives one [`IndexDirective`] per indexed field, keyed by
/// the field's storage name. Every field whose directive wants a standalone
/// index contributes a single-field model. Fields sharing a group name are
/// collected into one compound model whose key is ordered by the declared
/// `groupseq` of each field; fields with the same `groupseq` keep their
/// declaration order.
///
/// Single-field models are returned first, followed by compound models in the
/// order their groups were first seen. Callers should not depend on that
/// order: the reconciler compares models by canonical key.
///
/// # Examples
///
/// ```rust
/// use docindex::index::LocalIndexBuilder;
///
/// let models = LocalIndexBuilder::new()
///     .add_raw("last", "group=uniqueName,groupseq=2")?
///     .add_raw("first", "group=uniqueName,groupseq=1")?
///     .add_raw("email", "unique")?
///     .build();
///
/// assert_eq!(models.len(), 2);
/// assert_eq!(models[0].field_names(), vec!["email"]);
/// assert_eq!(models[1].field_names(), vec!["first", "last"]);
/// assert!(models[1].is_unique());
/// # Ok::<(), docindex::errors::DocIndexError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct LocalIndexBuilder {
    directives: Vec<(String, IndexDirective)>,
}

impl LocalIndexBuilder {
    pub fn new() -> Self {
        LocalIndexBuilder {
            directives: Vec::new(),
        }
    }

    /// Collects the directives declared by a schema descriptor.
    ///
    /// # Errors
    /// Returns the first directive parse error.
    pub fn from_schema(schema: &SchemaDescriptor) -> DocIndexResult<Self> {
        let mut builder = LocalIndexBuilder::new();
        for field in schema.indexed_fields() {
            if let Some(raw) = field.directive() {
                builder.add_raw(field.storage_name(), raw)?;
            }
        }
        Ok(builder)
    }

    /// Adds an already parsed directive for a field.
    pub fn add(&mut self, field: &str, directive: IndexDirective) -> &mut Self {
        self.directives.push((field.to_string(), directive));
        self
    }

    /// Parses and adds the raw directive of a field.
    ///
    /// # Errors
    /// Returns a `DirectiveParseError` naming the field.
    pub fn add_raw(&mut self, field: &str, raw: &str) -> DocIndexResult<&mut Self> {
        let directive = IndexDirective::parse(field, raw)?;
        Ok(self.add(field, directive))
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Produces the single-field models followed by the compound models.
    pub fn build(&self) -> Vec<IndexModel> {
        let mut singles = Vec::new();
        let mut groups: IndexMap<&str, Vec<(i64, IndexField)>> = IndexMap::new();

        for (field, directive) in &self.directives {
            if let Some(direction) = directive.single() {
                singles.push(IndexModel::single(field, direction, directive.is_unique()));
            }

            if directive.is_grouped() {
                groups
                    .entry(directive.group())
                    .or_default()
                    .push((directive.group_seq(), IndexField::new(field, directive.group_direction())));
            }
        }

        let compounds = groups.into_iter().map(|(group, mut members)| {
            // stable, so equal sequences keep declaration order
            members.sort_by_key(|(seq, _)| *seq);
            let fields = members.into_iter().map(|(_, field)| field).collect();
            IndexModel::compound(group, fields)
        });

        singles.extend(compounds);
        log::debug!("Built {} local index model(s)", singles.len());
        singles
    }
}
