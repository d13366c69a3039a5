use crate::ast::FieldMeta;
use crate::transpiler::traits::{CompileOptions, FieldResolver};

/// Resolves field names against the owning entity of the compile call.
///
/// Names the entity does not declare (or calls without an entity) resolve
/// to untyped metadata whose column is the name itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityResolver;

impl FieldResolver for EntityResolver {
    fn resolve_field(&self, name: &str, options: &CompileOptions<'_>) -> FieldMeta {
        options
            .entity
            .and_then(|entity| entity.lookup(name))
            .cloned()
            .unwrap_or_else(|| FieldMeta::untyped(name))
    }
}
