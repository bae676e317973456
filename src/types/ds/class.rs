//! Static class tables: the native identities the descriptor builder reflects over.
//!
//! A [`BeanClass`] is declared once (usually inside a `lazy_static!` block) with the fluent
//! builder returned by [`BeanClass::class`], [`BeanClass::interface`] and friends. Accessor
//! bodies are typed closures over the concrete struct; they are erased into [`Invoker`]s so the
//! path engine can call them without knowing the struct.

use std::any::TypeId;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::types::ds::annotations::{FieldAnnotations, TypeAnnotations};
use crate::types::ds::error::BeanError;
use crate::types::ds::object::{borrow_bean_mut, Bean, ObjectRef};
use crate::types::ds::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    Character,
}

impl PrimitiveKind {
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Integer => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Character => "char",
        }
    }

    pub fn boxed_name(&self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "Boolean",
            PrimitiveKind::Byte => "Byte",
            PrimitiveKind::Short => "Short",
            PrimitiveKind::Integer => "Integer",
            PrimitiveKind::Long => "Long",
            PrimitiveKind::Float => "Float",
            PrimitiveKind::Double => "Double",
            PrimitiveKind::Character => "Character",
        }
    }
}

/// Declared type of an accessor's return value or parameter.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum NativeType {
    /// Universal top type, accepts any value.
    Object,
    Primitive(PrimitiveKind),
    Boxed(PrimitiveKind),
    String,
    /// `None` when the generic component type has been erased.
    List(Option<Box<NativeType>>),
    Array(Box<NativeType>),
    /// String keyed map; `None` when the value type has been erased.
    Map(Option<Box<NativeType>>),
    Bean(ClassRef),
}

impl NativeType {
    pub fn list_of(component: NativeType) -> Self {
        NativeType::List(Some(Box::new(component)))
    }

    pub fn array_of(component: NativeType) -> Self {
        NativeType::Array(Box::new(component))
    }

    pub fn map_of(value: NativeType) -> Self {
        NativeType::Map(Some(Box::new(value)))
    }

    pub fn bean(class: ClassRef) -> Self {
        NativeType::Bean(class)
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, NativeType::Primitive(_))
    }

    /// Primitives become their boxed equivalent, everything else is returned as is.
    pub fn boxed(&self) -> NativeType {
        match self {
            NativeType::Primitive(kind) => NativeType::Boxed(*kind),
            other => other.clone(),
        }
    }

    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            NativeType::Primitive(kind) | NativeType::Boxed(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            NativeType::List(_) | NativeType::Array(_) | NativeType::Map(_)
        )
    }

    pub fn class(&self) -> Option<&ClassRef> {
        match self {
            NativeType::Bean(class) => Some(class),
            _ => None,
        }
    }

    /// Assignability of a runtime value to this declared type. `Null` is never accepted here,
    /// callers deal with absent values before asking.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (NativeType::Object, _) => true,
            (_, Value::Null) => false,
            (NativeType::Primitive(kind), v) | (NativeType::Boxed(kind), v) => {
                v.primitive_kind() == Some(*kind)
            }
            (NativeType::String, Value::String(_)) => true,
            (NativeType::List(_), Value::List(_)) => true,
            (NativeType::Array(expected), Value::Array { component, .. }) => {
                **expected == NativeType::Object || **expected == *component
            }
            (NativeType::Map(_), Value::Map(_)) => true,
            (NativeType::Bean(class), Value::Object(object)) => match object.try_borrow() {
                Ok(bean) => bean.bean_class().class().is_assignable_to(class),
                Err(_) => false,
            },
            (NativeType::Bean(class), Value::Content(content)) => {
                content.instance_class().class().is_assignable_to(class)
            }
            _ => false,
        }
    }
}

impl Display for NativeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            NativeType::Object => write!(f, "Object"),
            NativeType::Primitive(kind) => write!(f, "{}", kind.name()),
            NativeType::Boxed(kind) => write!(f, "{}", kind.boxed_name()),
            NativeType::String => write!(f, "String"),
            NativeType::List(Some(component)) => write!(f, "List<{}>", component),
            NativeType::List(None) => write!(f, "List"),
            NativeType::Array(component) => write!(f, "{}[]", component),
            NativeType::Map(Some(value)) => write!(f, "Map<String, {}>", value),
            NativeType::Map(None) => write!(f, "Map"),
            NativeType::Bean(class) => write!(f, "{}", class.name()),
        }
    }
}

impl Debug for NativeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

/// Reference to a class table.
///
/// `Static` defers to a `lazy_static!` accessor so classes can point at themselves (or at each
/// other) while they are being declared.
#[derive(Clone)]
pub enum ClassRef {
    Static(fn() -> Arc<BeanClass>),
    Loaded(Arc<BeanClass>),
}

impl ClassRef {
    pub fn lazy(accessor: fn() -> Arc<BeanClass>) -> Self {
        ClassRef::Static(accessor)
    }

    pub fn class(&self) -> Arc<BeanClass> {
        match self {
            ClassRef::Static(accessor) => accessor(),
            ClassRef::Loaded(class) => class.clone(),
        }
    }

    pub fn name(&self) -> String {
        self.class().name().to_string()
    }
}

impl From<Arc<BeanClass>> for ClassRef {
    fn from(class: Arc<BeanClass>) -> Self {
        ClassRef::Loaded(class)
    }
}

impl PartialEq for ClassRef {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for ClassRef {}

impl Hash for ClassRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state)
    }
}

impl Debug for ClassRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "ClassRef({})", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Abstract,
    Interface,
    Enum,
}

pub type Invoker = Arc<dyn Fn(&mut dyn Bean, Vec<Value>) -> Result<Value, BeanError> + Send + Sync>;

pub type Factory = Arc<dyn Fn() -> ObjectRef + Send + Sync>;

/// A declared accessor. Interface contracts leave `body` empty.
#[derive(Clone)]
pub struct Method {
    name: String,
    params: Vec<NativeType>,
    varargs: bool,
    return_type: Option<NativeType>,
    public: bool,
    annotations: FieldAnnotations,
    body: Option<Invoker>,
}

impl Method {
    pub fn new(name: &str, params: Vec<NativeType>, return_type: Option<NativeType>) -> Self {
        Method {
            name: name.to_string(),
            params,
            varargs: false,
            return_type,
            public: true,
            annotations: FieldAnnotations::default(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: Invoker) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_varargs(mut self) -> Self {
        self.varargs = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[NativeType] {
        &self.params
    }

    pub fn is_varargs(&self) -> bool {
        self.varargs
    }

    pub fn return_type(&self) -> Option<&NativeType> {
        self.return_type.as_ref()
    }

    pub fn is_public(&self) -> bool {
        self.public
    }

    pub fn annotations(&self) -> &FieldAnnotations {
        &self.annotations
    }

    pub fn is_abstract(&self) -> bool {
        self.body.is_none()
    }

    /// Calls the accessor on `target`. Virtual instances intercept every call by name.
    pub fn invoke(&self, target: &ObjectRef, args: Vec<Value>) -> Result<Value, BeanError> {
        let mut bean = borrow_bean_mut(target)?;
        if let Some(virtual_instance) = bean.as_virtual_mut() {
            return virtual_instance.invoke(self, args);
        }
        match &self.body {
            Some(body) => body(&mut *bean, args),
            None => Err(BeanError::invocation(&self.name, "abstract method")),
        }
    }
}

impl Debug for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
        }
        if self.varargs {
            write!(f, "...")?;
        }
        match &self.return_type {
            Some(t) => write!(f, "): {}", t),
            None => write!(f, ")"),
        }
    }
}

pub struct BeanClass {
    name: String,
    kind: ClassKind,
    superclass: Option<ClassRef>,
    interfaces: Vec<ClassRef>,
    methods: Vec<Method>,
    factory: Option<Factory>,
    annotations: TypeAnnotations,
    enum_constants: Vec<String>,
    synthetic: bool,
}

impl BeanClass {
    pub fn class(name: &str) -> BeanClassBuilder {
        BeanClassBuilder::new(name, ClassKind::Class)
    }

    pub fn abstract_class(name: &str) -> BeanClassBuilder {
        BeanClassBuilder::new(name, ClassKind::Abstract)
    }

    pub fn interface(name: &str) -> BeanClassBuilder {
        BeanClassBuilder::new(name, ClassKind::Interface)
    }

    pub fn enumeration(name: &str, constants: &[&str]) -> BeanClassBuilder {
        let mut builder = BeanClassBuilder::new(name, ClassKind::Enum);
        builder.class.enum_constants = constants.iter().map(|c| c.to_string()).collect();
        builder
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    pub fn superclass(&self) -> Option<&ClassRef> {
        self.superclass.as_ref()
    }

    pub fn interfaces(&self) -> &[ClassRef] {
        &self.interfaces
    }

    /// Methods declared on this class only, inherited ones are not listed.
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn factory(&self) -> Option<&Factory> {
        self.factory.as_ref()
    }

    pub fn annotations(&self) -> &TypeAnnotations {
        &self.annotations
    }

    pub fn enum_constants(&self) -> &[String] {
        &self.enum_constants
    }

    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    pub fn declared_method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Public method lookup by signature, walking the superclass and then the interfaces.
    pub fn find_method(&self, name: &str, params: &[NativeType]) -> Option<Method> {
        if let Some(method) = self
            .methods
            .iter()
            .find(|m| m.public && m.name == name && m.params == params)
        {
            return Some(method.clone());
        }
        if let Some(method) = self
            .superclass
            .as_ref()
            .and_then(|s| s.class().find_method(name, params))
        {
            return Some(method);
        }
        self.interfaces
            .iter()
            .find_map(|i| i.class().find_method(name, params))
    }

    pub fn is_assignable_to(&self, other: &ClassRef) -> bool {
        let target = other.name();
        self.is_assignable_to_name(&target)
    }

    fn is_assignable_to_name(&self, target: &str) -> bool {
        if self.name == target {
            return true;
        }
        if let Some(superclass) = &self.superclass {
            if superclass.class().is_assignable_to_name(target) {
                return true;
            }
        }
        self.interfaces
            .iter()
            .any(|i| i.class().is_assignable_to_name(target))
    }
}

impl Debug for BeanClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanClass")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("methods", &self.methods)
            .finish()
    }
}

pub struct BeanClassBuilder {
    class: BeanClass,
}

impl BeanClassBuilder {
    fn new(name: &str, kind: ClassKind) -> Self {
        BeanClassBuilder {
            class: BeanClass {
                name: name.to_string(),
                kind,
                superclass: None,
                interfaces: vec![],
                methods: vec![],
                factory: None,
                annotations: TypeAnnotations::default(),
                enum_constants: vec![],
                synthetic: false,
            },
        }
    }

    pub fn extends(mut self, superclass: ClassRef) -> Self {
        self.class.superclass = Some(superclass);
        self
    }

    pub fn implements(mut self, interface: ClassRef) -> Self {
        self.class.interfaces.push(interface);
        self
    }

    /// Marks a dynamically synthesized implementation: its id is that of its first interface.
    pub fn synthetic(mut self) -> Self {
        self.class.synthetic = true;
        self
    }

    pub fn annotate(mut self, annotations: TypeAnnotations) -> Self {
        self.class.annotations = annotations;
        self
    }

    pub fn factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> ObjectRef + Send + Sync + 'static,
    {
        self.class.factory = Some(Arc::new(factory));
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.class.methods.push(method);
        self
    }

    pub fn getter<T, F>(self, name: &str, return_type: NativeType, read: F) -> Self
    where
        T: Bean,
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        let method_name = name.to_string();
        let body: Invoker = Arc::new(move |bean: &mut dyn Bean, _args: Vec<Value>| {
            let this = downcast_ref::<T>(bean)
                .ok_or_else(|| BeanError::invocation(&method_name, "receiver has the wrong type"))?;
            Ok(read(this))
        });
        self.method(Method::new(name, vec![], Some(return_type)).with_body(body))
    }

    /// A reader taking a single variadic parameter that may be called without values.
    pub fn varargs_getter<T, F>(
        self,
        name: &str,
        component: NativeType,
        return_type: NativeType,
        read: F,
    ) -> Self
    where
        T: Bean,
        F: Fn(&T, Vec<Value>) -> Value + Send + Sync + 'static,
    {
        let method_name = name.to_string();
        let body: Invoker = Arc::new(move |bean: &mut dyn Bean, args: Vec<Value>| {
            let this = downcast_ref::<T>(bean)
                .ok_or_else(|| BeanError::invocation(&method_name, "receiver has the wrong type"))?;
            let values = match args.into_iter().next() {
                Some(Value::Array { items, .. }) | Some(Value::List(items)) => items,
                _ => vec![],
            };
            Ok(read(this, values))
        });
        let method = Method::new(name, vec![NativeType::array_of(component)], Some(return_type))
            .with_varargs()
            .with_body(body);
        self.method(method)
    }

    pub fn setter<T, F>(self, name: &str, param: NativeType, write: F) -> Self
    where
        T: Bean,
        F: Fn(&mut T, Value) -> Result<(), BeanError> + Send + Sync + 'static,
    {
        let method_name = name.to_string();
        let body: Invoker = Arc::new(move |bean: &mut dyn Bean, args: Vec<Value>| {
            let this = downcast_mut::<T>(bean)
                .ok_or_else(|| BeanError::invocation(&method_name, "receiver has the wrong type"))?;
            let value = args.into_iter().next().unwrap_or(Value::Null);
            write(this, value)?;
            Ok(Value::Null)
        });
        self.method(Method::new(name, vec![param], None).with_body(body))
    }

    pub fn abstract_getter(self, name: &str, return_type: NativeType) -> Self {
        self.method(Method::new(name, vec![], Some(return_type)))
    }

    pub fn abstract_setter(self, name: &str, param: NativeType) -> Self {
        self.method(Method::new(name, vec![param], None))
    }

    /// Attaches annotations to the most recently declared method.
    pub fn annotated(mut self, annotations: FieldAnnotations) -> Self {
        if let Some(method) = self.class.methods.last_mut() {
            method.annotations = annotations;
        }
        self
    }

    /// Hides the most recently declared method from reflection.
    pub fn private(mut self) -> Self {
        if let Some(method) = self.class.methods.last_mut() {
            method.public = false;
        }
        self
    }

    pub fn build(self) -> Arc<BeanClass> {
        Arc::new(self.class)
    }
}

fn downcast_ref<T: Bean>(bean: &dyn Bean) -> Option<&T> {
    if let Some(this) = bean.as_any().downcast_ref::<T>() {
        return Some(this);
    }
    bean.as_part(TypeId::of::<T>())
        .and_then(|part| part.downcast_ref::<T>())
}

fn downcast_mut<T: Bean>(bean: &mut dyn Bean) -> Option<&mut T> {
    if bean.as_any().is::<T>() {
        return bean.as_any_mut().downcast_mut::<T>();
    }
    bean.as_part_mut(TypeId::of::<T>())
        .and_then(|part| part.downcast_mut::<T>())
}

pub fn is_reader(accessor: &str) -> bool {
    accessor.starts_with("get") || accessor.starts_with("is")
}

pub fn is_writer(accessor: &str) -> bool {
    accessor.starts_with("set")
}

/// `getFirstName`, `isActive` and `setFirstName` become `firstName`, `active`, `firstName`.
pub fn field_name(accessor: &str) -> Option<String> {
    let suffix = ["get", "set", "is"]
        .iter()
        .find_map(|prefix| accessor.strip_prefix(prefix))?
        .trim();
    if suffix.is_empty() {
        return None;
    }
    Some(lower_first(suffix))
}

pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
