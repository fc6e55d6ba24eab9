//! JVM descriptor encoding for source-language types.

use crate::types::Type;

/// Maps types to descriptors relative to one class and its imports.
#[derive(Clone, Copy, Debug)]
pub struct DescriptorMapper<'a> {
    class_name: &'a str,
    imports: &'a [String],
}

impl<'a> DescriptorMapper<'a> {
    pub fn new(class_name: &'a str, imports: &'a [String]) -> Self {
        DescriptorMapper {
            class_name,
            imports,
        }
    }

    pub fn class_name(&self) -> &'a str {
        self.class_name
    }

    /// Returns the JVM descriptor string for `ty`.
    pub fn descriptor(&self, ty: &Type) -> String {
        match ty {
            Type::Int => "I".into(),
            Type::Boolean => "Z".into(),
            Type::Void => "V".into(),
            Type::String => "Ljava/lang/String;".into(),
            Type::This => format!("L{};", self.resolve(self.class_name)),
            Type::Object(name) => format!("L{};", self.resolve(name)),
            Type::Array(inner) => format!("[{}", self.descriptor(inner)),
        }
    }

    /// `(params)ret` method descriptor.
    pub fn method_descriptor<'t>(
        &self,
        params: impl IntoIterator<Item = &'t Type>,
        ret: &Type,
    ) -> String {
        let params: String = params.into_iter().map(|p| self.descriptor(p)).collect();
        format!("({}){}", params, self.descriptor(ret))
    }

    /// Internal (slashed) class name used as an instruction operand.
    ///
    /// Arrays use their descriptor, which is what `anewarray` expects for
    /// nested arrays.
    pub fn internal_name(&self, ty: &Type) -> String {
        match ty {
            Type::String => "java/lang/String".into(),
            Type::This => self.resolve(self.class_name),
            Type::Object(name) => self.resolve(name),
            other => self.descriptor(other),
        }
    }

    /// Fully qualified slashed name of a class referenced by its simple name.
    pub fn resolve(&self, name: &str) -> String {
        resolve_class_name(name, self.imports)
    }
}

/// Resolve a simple class name against the import list.
///
/// The first import whose last segment equals `name` wins and is returned with
/// dots replaced by slashes. Unknown names come back unchanged: they are the
/// current class or already qualified.
pub fn resolve_class_name(name: &str, imports: &[String]) -> String {
    imports
        .iter()
        .find(|import| crate::symbol_table::last_segment(import) == name)
        .map(|import| import.replace('.', "/"))
        .unwrap_or_else(|| name.to_string())
}
