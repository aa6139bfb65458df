//! The structural event contract
//!
//! A class-file reader (an external collaborator, out of scope here) walks a
//! class and pushes one callback per structural fact: the class header, each
//! member declaration, each instruction, metadata such as stack-map frames
//! and try/catch ranges, and annotation values. Every consumer in this crate
//! implements the traits below; checking consumers may refuse an event by
//! returning an error, which aborts the traversal.
//!
//! Expected ordering: `visit_header` before any member event; each method's
//! instruction and metadata events between its declaration and its own
//! `visit_end`, with `visit_maxs` last among them; annotation value events
//! between the annotation's declaration and its `visit_end`; the class
//! `visit_end` last overall.

use crate::errors::Result;
use bitflags::bitflags;
use std::fmt;

/// Opaque token standing for a bytecode position.
///
/// A label has no value, only identity: the same label visited once and then
/// referenced from jumps, switches, or variable ranges always denotes the
/// same position. Identifiers are assigned by the driver via
/// [`LabelGenerator`]; consumers only ever compare them.
#[derive(Copy, Clone, Hash, Eq, PartialEq)]
pub struct Label(u32);

impl Label {
    /// First label in a method
    pub const START: Label = Label(0);

    /// Get the next fresh label
    pub fn next(&self) -> Label {
        Label(self.0 + 1)
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "l{}", self.0)
    }
}

/// Hands out fresh labels
///
/// Cloning does not split the generator source - the cloned generator will
/// produce the same sequence of labels as the original.
#[derive(Clone)]
pub struct LabelGenerator(Label);

impl Default for LabelGenerator {
    fn default() -> LabelGenerator {
        LabelGenerator::new()
    }
}

impl LabelGenerator {
    pub fn new() -> LabelGenerator {
        LabelGenerator(Label::START)
    }

    /// Generate a fresh label
    pub fn fresh_label(&mut self) -> Label {
        let to_return = self.0;
        self.0 = self.0.next();
        to_return
    }
}

bitflags! {
    /// Access and property flags
    ///
    /// One bit can carry different meanings depending on context: 0x0020 is
    /// `SUPER` on a class and `SYNCHRONIZED` on a method, 0x0040 is
    /// `VOLATILE` on a field and `BRIDGE` on a method, 0x0080 is `TRANSIENT`
    /// on a field and `VARARGS` on a method. `DEPRECATED` is a pseudo-flag
    /// outside the u16 the class-file format stores.
    ///
    /// [0]: https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-4.html#jvms-4.1-200-E.1
    pub struct AccessFlags: u32 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const SUPER = 0x0020;
        const SYNCHRONIZED = 0x0020;
        const VOLATILE = 0x0040;
        const BRIDGE = 0x0040;
        const TRANSIENT = 0x0080;
        const VARARGS = 0x0080;
        const NATIVE = 0x0100;
        const INTERFACE = 0x0200;
        const ABSTRACT = 0x0400;
        const STRICT = 0x0800;
        const SYNTHETIC = 0x1000;
        const ANNOTATION = 0x2000;
        const ENUM = 0x4000;
        const DEPRECATED = 0x2_0000;
    }
}

/// A loadable constant: an `ldc` operand, a field's initial value, or a
/// bootstrap method argument.
#[derive(Clone, PartialEq, Debug)]
pub enum Constant {
    Int(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Str(String),
    /// A type reference, carried as its field descriptor
    Class(String),
}

/// The nine method-handle kinds.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum HandleKind {
    GetField,
    GetStatic,
    PutField,
    PutStatic,
    InvokeVirtual,
    InvokeStatic,
    InvokeSpecial,
    NewInvokeSpecial,
    InvokeInterface,
}

impl HandleKind {
    /// Numeric tag as stored in the class-file format
    pub fn tag(&self) -> u8 {
        match self {
            HandleKind::GetField => 1,
            HandleKind::GetStatic => 2,
            HandleKind::PutField => 3,
            HandleKind::PutStatic => 4,
            HandleKind::InvokeVirtual => 5,
            HandleKind::InvokeStatic => 6,
            HandleKind::InvokeSpecial => 7,
            HandleKind::NewInvokeSpecial => 8,
            HandleKind::InvokeInterface => 9,
        }
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            HandleKind::GetField => "GETFIELD",
            HandleKind::GetStatic => "GETSTATIC",
            HandleKind::PutField => "PUTFIELD",
            HandleKind::PutStatic => "PUTSTATIC",
            HandleKind::InvokeVirtual => "INVOKEVIRTUAL",
            HandleKind::InvokeStatic => "INVOKESTATIC",
            HandleKind::InvokeSpecial => "INVOKESPECIAL",
            HandleKind::NewInvokeSpecial => "NEWINVOKESPECIAL",
            HandleKind::InvokeInterface => "INVOKEINTERFACE",
        }
    }

    /// Variant name in this crate's API, used by the generator-source output
    pub fn variant_name(&self) -> &'static str {
        match self {
            HandleKind::GetField => "GetField",
            HandleKind::GetStatic => "GetStatic",
            HandleKind::PutField => "PutField",
            HandleKind::PutStatic => "PutStatic",
            HandleKind::InvokeVirtual => "InvokeVirtual",
            HandleKind::InvokeStatic => "InvokeStatic",
            HandleKind::InvokeSpecial => "InvokeSpecial",
            HandleKind::NewInvokeSpecial => "NewInvokeSpecial",
            HandleKind::InvokeInterface => "InvokeInterface",
        }
    }
}

/// Reference to a field or method, as used by `invokedynamic` bootstrap
/// methods and their arguments.
#[derive(Clone, PartialEq, Debug)]
pub struct Handle {
    pub kind: HandleKind,
    pub owner: String,
    pub name: String,
    pub descriptor: String,
}

impl Handle {
    pub fn new(
        kind: HandleKind,
        owner: impl Into<String>,
        name: impl Into<String>,
        descriptor: impl Into<String>,
    ) -> Handle {
        Handle {
            kind,
            owner: owner.into(),
            name: name.into(),
            descriptor: descriptor.into(),
        }
    }
}

/// Static argument to an `invokedynamic` bootstrap method.
#[derive(Clone, PartialEq, Debug)]
pub enum BootstrapArgument {
    Constant(Constant),
    Handle(Handle),
}

/// A typed constant inside an annotation.
#[derive(Clone, PartialEq, Debug)]
pub enum AnnotationValue {
    Boolean(bool),
    Byte(i8),
    Char(char),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(String),
    /// A type reference, carried as its field descriptor
    Class(String),
    BooleanArray(Vec<bool>),
    ByteArray(Vec<i8>),
    CharArray(Vec<char>),
    ShortArray(Vec<i16>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
    FloatArray(Vec<f32>),
    DoubleArray(Vec<f64>),
}

/// Verification type of one stack slot or local variable in a stack-map
/// frame.
#[derive(Clone, PartialEq, Debug)]
pub enum VerificationType {
    Top,
    Integer,
    Float,
    Double,
    Long,
    Null,
    UninitializedThis,
    /// An internal class name or an array descriptor
    Object(String),
    /// Value produced by the `NEW` at the given label, not yet constructed
    Uninitialized(Label),
}

/// A stack-map frame event, one variant per compression kind.
#[derive(Clone, PartialEq, Debug)]
pub enum StackFrame {
    /// Same locals as the previous frame, empty stack
    Same,
    /// Same locals as the previous frame, one stack entry
    Same1(VerificationType),
    /// Previous locals plus up to three more, empty stack
    Append(Vec<VerificationType>),
    /// Previous locals minus the given count (1–3), empty stack
    Chop(u8),
    /// Complete locals and stack, compressed form
    Full {
        locals: Vec<VerificationType>,
        stack: Vec<VerificationType>,
    },
    /// Complete locals and stack, expanded form
    New {
        locals: Vec<VerificationType>,
        stack: Vec<VerificationType>,
    },
}

/// Consumer of annotation-scope events.
pub trait AnnotationConsumer {
    /// A primitive, string, class, or primitive-array element. `name` is
    /// `None` for positional elements inside arrays.
    fn visit_value(&mut self, name: Option<&str>, value: &AnnotationValue) -> Result<()>;

    /// An enum constant element
    fn visit_enum(&mut self, name: Option<&str>, descriptor: &str, value: &str) -> Result<()>;

    /// A nested annotation element; its values go to the returned consumer
    fn visit_nested(
        &mut self,
        name: Option<&str>,
        descriptor: &str,
    ) -> Result<Box<dyn AnnotationConsumer>>;

    /// An array element whose entries are not all primitive; entries go to
    /// the returned consumer as positional values
    fn visit_array(&mut self, name: Option<&str>) -> Result<Box<dyn AnnotationConsumer>>;

    fn visit_end(&mut self) -> Result<()>;
}

/// Consumer of field-scope events.
pub trait FieldConsumer {
    fn visit_annotation(
        &mut self,
        descriptor: &str,
        visible: bool,
    ) -> Result<Box<dyn AnnotationConsumer>>;

    fn visit_end(&mut self) -> Result<()>;
}

/// Consumer of method-scope events.
pub trait MethodConsumer {
    fn visit_annotation(
        &mut self,
        descriptor: &str,
        visible: bool,
    ) -> Result<Box<dyn AnnotationConsumer>>;

    /// Default value of an annotation-interface member
    fn visit_annotation_default(&mut self) -> Result<Box<dyn AnnotationConsumer>>;

    fn visit_parameter_annotation(
        &mut self,
        parameter: u32,
        descriptor: &str,
        visible: bool,
    ) -> Result<Box<dyn AnnotationConsumer>>;

    /// Start of the code attribute; instruction events may follow
    fn visit_code(&mut self) -> Result<()>;

    fn visit_frame(&mut self, frame: &StackFrame) -> Result<()>;

    fn visit_insn(&mut self, opcode: u8) -> Result<()>;

    fn visit_int_insn(&mut self, opcode: u8, operand: i32) -> Result<()>;

    fn visit_var_insn(&mut self, opcode: u8, var: i32) -> Result<()>;

    fn visit_type_insn(&mut self, opcode: u8, type_name: &str) -> Result<()>;

    fn visit_field_insn(
        &mut self,
        opcode: u8,
        owner: &str,
        name: &str,
        descriptor: &str,
    ) -> Result<()>;

    fn visit_method_insn(
        &mut self,
        opcode: u8,
        owner: &str,
        name: &str,
        descriptor: &str,
    ) -> Result<()>;

    fn visit_invoke_dynamic(
        &mut self,
        name: &str,
        descriptor: &str,
        bootstrap: &Handle,
        arguments: &[BootstrapArgument],
    ) -> Result<()>;

    fn visit_jump_insn(&mut self, opcode: u8, label: Label) -> Result<()>;

    fn visit_label(&mut self, label: Label) -> Result<()>;

    fn visit_ldc_insn(&mut self, constant: &Constant) -> Result<()>;

    fn visit_iinc_insn(&mut self, var: i32, increment: i32) -> Result<()>;

    fn visit_table_switch(
        &mut self,
        min: i32,
        max: i32,
        default: Label,
        labels: &[Label],
    ) -> Result<()>;

    fn visit_lookup_switch(&mut self, default: Label, keys: &[i32], labels: &[Label])
        -> Result<()>;

    fn visit_multi_new_array(&mut self, descriptor: &str, dimensions: i32) -> Result<()>;

    fn visit_try_catch(
        &mut self,
        start: Label,
        end: Label,
        handler: Label,
        catch_type: Option<&str>,
    ) -> Result<()>;

    fn visit_local_variable(
        &mut self,
        name: &str,
        descriptor: &str,
        signature: Option<&str>,
        start: Label,
        end: Label,
        index: i32,
    ) -> Result<()>;

    fn visit_line_number(&mut self, line: i32, start: Label) -> Result<()>;

    /// Last code event before `visit_end`
    fn visit_maxs(&mut self, max_stack: i32, max_locals: i32) -> Result<()>;

    fn visit_end(&mut self) -> Result<()>;
}

/// Consumer of class-scope events, the entry point of every chain.
pub trait ClassConsumer {
    #[allow(clippy::too_many_arguments)]
    fn visit_header(
        &mut self,
        version: u32,
        access: AccessFlags,
        name: &str,
        signature: Option<&str>,
        super_name: Option<&str>,
        interfaces: &[&str],
    ) -> Result<()>;

    /// Source file and extra debug info; at most once per class
    fn visit_source(&mut self, file: Option<&str>, debug: Option<&str>) -> Result<()>;

    /// Enclosing method of a local or anonymous class; at most once
    fn visit_outer_class(
        &mut self,
        owner: &str,
        name: Option<&str>,
        descriptor: Option<&str>,
    ) -> Result<()>;

    fn visit_inner_class(
        &mut self,
        name: &str,
        outer_name: Option<&str>,
        inner_name: Option<&str>,
        access: AccessFlags,
    ) -> Result<()>;

    fn visit_annotation(
        &mut self,
        descriptor: &str,
        visible: bool,
    ) -> Result<Box<dyn AnnotationConsumer>>;

    fn visit_field(
        &mut self,
        access: AccessFlags,
        name: &str,
        descriptor: &str,
        signature: Option<&str>,
        value: Option<&Constant>,
    ) -> Result<Box<dyn FieldConsumer>>;

    fn visit_method(
        &mut self,
        access: AccessFlags,
        name: &str,
        descriptor: &str,
        signature: Option<&str>,
        exceptions: &[&str],
    ) -> Result<Box<dyn MethodConsumer>>;

    fn visit_end(&mut self) -> Result<()>;
}
