use log::debug;

/// Normalized view of a Rust type as it appears in a handler signature or a
/// value-object field.
///
/// References, `Box`, `Arc` and `Rc` are unwrapped transparently; `Option<T>`
/// is unwrapped to `T` with the `optional` flag set. Arrays and slices carry
/// their element as the single entry in `args` with the `array` flag set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    /// The base type name (e.g. "String", "CustomerVO", "Vec")
    pub name: String,
    /// Generic type arguments, in declaration order
    pub args: Vec<TypeRef>,
    /// The type was wrapped in `Option<T>`
    pub optional: bool,
    /// The type was an array or slice
    pub array: bool,
}

/// Shape classification of a type, driving cardinality and traversal decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Scalar,
    List,
    Set,
    Array,
    Map,
}

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            optional: false,
            array: false,
        }
    }

    /// Builds a `TypeRef` from a syn type, unwrapping transparent wrappers.
    pub fn from_syn(ty: &syn::Type) -> TypeRef {
        match ty {
            syn::Type::Path(type_path) => Self::from_path(&type_path.path),
            syn::Type::Reference(reference) => Self::from_syn(&reference.elem),
            syn::Type::Array(array) => Self::array_of(Self::from_syn(&array.elem)),
            syn::Type::Slice(slice) => Self::array_of(Self::from_syn(&slice.elem)),
            syn::Type::Paren(paren) => Self::from_syn(&paren.elem),
            syn::Type::Group(group) => Self::from_syn(&group.elem),
            syn::Type::Tuple(tuple) if tuple.elems.is_empty() => TypeRef::new("()"),
            _ => {
                debug!("Unsupported type form, treating as opaque");
                TypeRef::new("Unknown")
            }
        }
    }

    fn from_path(path: &syn::Path) -> TypeRef {
        let Some(segment) = path.segments.last() else {
            return TypeRef::new("Unknown");
        };
        let type_name = segment.ident.to_string();
        let args = Self::generic_args(segment);

        match type_name.as_str() {
            "Option" => match args.into_iter().next() {
                Some(mut inner) => {
                    inner.optional = true;
                    inner
                }
                None => TypeRef::new("Option"),
            },
            "Box" | "Arc" | "Rc" => args
                .into_iter()
                .next()
                .unwrap_or_else(|| TypeRef::new(type_name)),
            _ => TypeRef {
                name: type_name,
                args,
                optional: false,
                array: false,
            },
        }
    }

    fn generic_args(segment: &syn::PathSegment) -> Vec<TypeRef> {
        let mut args = Vec::new();
        if let syn::PathArguments::AngleBracketed(bracketed) = &segment.arguments {
            for arg in &bracketed.args {
                if let syn::GenericArgument::Type(inner) = arg {
                    args.push(Self::from_syn(inner));
                }
            }
        }
        args
    }

    fn array_of(element: TypeRef) -> TypeRef {
        TypeRef {
            name: element.name.clone(),
            args: vec![element],
            optional: false,
            array: true,
        }
    }

    /// Shape of this type; everything that is not a known collection is a scalar.
    pub fn shape(&self) -> Shape {
        if self.array {
            return Shape::Array;
        }
        match self.name.as_str() {
            "Vec" | "VecDeque" | "LinkedList" => Shape::List,
            "HashSet" | "BTreeSet" => Shape::Set,
            "HashMap" | "BTreeMap" => Shape::Map,
            _ => Shape::Scalar,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self.shape(), Shape::List | Shape::Set | Shape::Array)
    }

    pub fn is_map(&self) -> bool {
        self.shape() == Shape::Map
    }

    /// Element type of a collection or map.
    ///
    /// Arrays yield their component type directly; parameterized collections
    /// yield the first type argument, maps their value argument. Returns `None`
    /// for raw (unparameterized) usage — callers treat that as opaque.
    pub fn element_type(&self) -> Option<&TypeRef> {
        match self.shape() {
            Shape::Array | Shape::List | Shape::Set => self.args.first(),
            Shape::Map => self.args.get(1),
            Shape::Scalar => None,
        }
    }

    /// For `Result<T, E>` returns `(T, Some(E))`, otherwise `(self, None)`.
    pub fn unwrap_result(&self) -> (&TypeRef, Option<&TypeRef>) {
        if self.name == "Result" && !self.args.is_empty() {
            (&self.args[0], self.args.get(1))
        } else {
            (self, None)
        }
    }
}

/// Built-in types never get a data type record of their own; they resolve to
/// inline scalar display names.
pub fn is_builtin(name: &str) -> bool {
    matches!(
        name,
        "String"
            | "str"
            | "bool"
            | "char"
            | "i8"
            | "i16"
            | "i32"
            | "i64"
            | "i128"
            | "isize"
            | "u8"
            | "u16"
            | "u32"
            | "u64"
            | "u128"
            | "usize"
            | "f32"
            | "f64"
            | "()"
            | "Uuid"
            | "DateTime"
            | "NaiveDate"
            | "NaiveDateTime"
            | "Decimal"
            | "BigDecimal"
    )
}

/// Remaps a few scalar type names to documentation-friendly display names.
pub fn scalar_display_name(name: &str) -> &str {
    match name {
        "Decimal" | "BigDecimal" | "f32" | "f64" => "Number",
        "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64" | "u128"
        | "usize" => "Number (int)",
        "str" => "String",
        other => other,
    }
}

/// Extracts `{segment}` template names from a path, in positional order.
pub fn path_variables(path: &str) -> Vec<String> {
    let mut variables = Vec::new();
    let mut rest = path;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                variables.push(after[..end].to_string());
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    variables
}
