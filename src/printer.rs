//! Disassembly printers
//!
//! One printer per scope kind, each appending rendered fragments to its
//! scope's [`Text`] tree. Member scopes splice a child tree into the parent
//! at the declaration point, so interleaved member events still render
//! contiguously.
//!
//! Printers do no validation. They are total over well-formed events; feed
//! them through a [`crate::check::ClassChecker`] when the event source is
//! not trusted.

use crate::errors::Result;
use crate::event::{
    AccessFlags, AnnotationConsumer, AnnotationValue, BootstrapArgument, ClassConsumer, Constant,
    FieldConsumer, Handle, Label, MethodConsumer, StackFrame, VerificationType,
};
use crate::opcodes;
use crate::signature;
use crate::text::{push_quoted, Text};
use std::collections::HashMap;

/// Indent for class members
const TAB: &str = "  ";
/// Indent for bytecode instructions
const TAB2: &str = "    ";
/// Indent for switch cases and handle comments
const TAB3: &str = "      ";
/// Indent for label lines
const LTAB: &str = "   ";

/// Symbolic label names in first-reference order: `L0`, `L1`, ...
#[derive(Default)]
struct LabelNames {
    names: HashMap<Label, usize>,
}

impl LabelNames {
    fn push(&mut self, out: &mut String, label: Label) {
        let next = self.names.len();
        let id = *self.names.entry(label).or_insert(next);
        out.push('L');
        out.push_str(&id.to_string());
    }
}

fn push_access(out: &mut String, access: AccessFlags) {
    const WORDS: &[(AccessFlags, &str)] = &[
        (AccessFlags::PUBLIC, "public "),
        (AccessFlags::PRIVATE, "private "),
        (AccessFlags::PROTECTED, "protected "),
        (AccessFlags::FINAL, "final "),
        (AccessFlags::STATIC, "static "),
        (AccessFlags::SYNCHRONIZED, "synchronized "),
        (AccessFlags::VOLATILE, "volatile "),
        (AccessFlags::TRANSIENT, "transient "),
        (AccessFlags::ABSTRACT, "abstract "),
        (AccessFlags::STRICT, "strictfp "),
        (AccessFlags::SYNTHETIC, "synthetic "),
        (AccessFlags::ENUM, "enum "),
    ];
    for (flag, word) in WORDS {
        if access.contains(*flag) {
            out.push_str(word);
        }
    }
}

/// Source-literal rendering of a loadable constant: strings quoted and
/// escaped, type references as `<descriptor>.class`, and long/float/double
/// values carrying their `L`/`F`/`D` suffix.
fn push_constant(out: &mut String, constant: &Constant) {
    match constant {
        Constant::Int(value) => out.push_str(&value.to_string()),
        Constant::Float(value) => out.push_str(&format!("{:?}F", value)),
        Constant::Long(value) => out.push_str(&format!("{}L", value)),
        Constant::Double(value) => out.push_str(&format!("{:?}D", value)),
        Constant::Str(value) => push_quoted(out, value),
        Constant::Class(descriptor) => {
            out.push_str(descriptor);
            out.push_str(".class");
        }
    }
}

/// Prints a disassembled view of the class it consumes.
#[derive(Default)]
pub struct ClassPrinter {
    text: Text,
}

impl ClassPrinter {
    pub fn new() -> ClassPrinter {
        ClassPrinter { text: Text::new() }
    }

    /// Handle on the underlying tree; shares state with this printer.
    pub fn text(&self) -> Text {
        self.text.clone()
    }

    /// Rendered output; complete only after the class scope has ended.
    pub fn render(&self) -> String {
        self.text.render()
    }

    pub(crate) fn begin_annotation(&mut self, descriptor: &str, visible: bool) -> AnnotationPrinter {
        self.text.push_str("\n");
        annotation_block(&self.text, TAB, descriptor, visible)
    }

    pub(crate) fn begin_field(
        &mut self,
        access: AccessFlags,
        name: &str,
        descriptor: &str,
        signature_: Option<&str>,
        value: Option<&Constant>,
    ) -> Result<FieldPrinter> {
        let mut buf = String::from("\n");
        if access.contains(AccessFlags::DEPRECATED) {
            buf.push_str(TAB);
            buf.push_str("// DEPRECATED\n");
        }
        buf.push_str(&format!("{}// access flags 0x{:X}\n", TAB, access.bits()));
        if let Some(sig) = signature_ {
            buf.push_str(&format!("{}// signature {}\n", TAB, sig));
            buf.push_str(&format!(
                "{}// declaration: {}\n",
                TAB,
                signature::type_declaration(sig)?
            ));
        }
        buf.push_str(TAB);
        push_access(&mut buf, access);
        buf.push_str(descriptor);
        buf.push(' ');
        buf.push_str(name);
        if let Some(value) = value {
            buf.push_str(" = ");
            push_constant(&mut buf, value);
        }
        buf.push('\n');
        self.text.push_str(buf);
        Ok(FieldPrinter {
            text: self.text.push_child(),
        })
    }

    pub(crate) fn begin_method(
        &mut self,
        access: AccessFlags,
        name: &str,
        descriptor: &str,
        signature_: Option<&str>,
        exceptions: &[&str],
    ) -> Result<MethodPrinter> {
        let mut buf = String::from("\n");
        if access.contains(AccessFlags::DEPRECATED) {
            buf.push_str(TAB);
            buf.push_str("// DEPRECATED\n");
        }
        buf.push_str(&format!("{}// access flags 0x{:X}\n", TAB, access.bits()));
        if let Some(sig) = signature_ {
            buf.push_str(&format!("{}// signature {}\n", TAB, sig));
            let decl = signature::method_declaration(sig)?;
            buf.push_str(&format!(
                "{}// declaration: {} {}{}",
                TAB, decl.return_type, name, decl.declaration
            ));
            if let Some(exceptions) = decl.exceptions {
                buf.push_str(" throws ");
                buf.push_str(&exceptions);
            }
            buf.push('\n');
        }
        buf.push_str(TAB);
        // the volatile and transient bits read as bridge and varargs here
        push_access(
            &mut buf,
            access & !(AccessFlags::VOLATILE | AccessFlags::TRANSIENT),
        );
        if access.contains(AccessFlags::NATIVE) {
            buf.push_str("native ");
        }
        if access.contains(AccessFlags::VARARGS) {
            buf.push_str("varargs ");
        }
        if access.contains(AccessFlags::BRIDGE) {
            buf.push_str("bridge ");
        }
        buf.push_str(name);
        buf.push_str(descriptor);
        if !exceptions.is_empty() {
            buf.push_str(" throws ");
            for exception in exceptions {
                buf.push_str(exception);
                buf.push(' ');
            }
        }
        buf.push('\n');
        self.text.push_str(buf);
        Ok(MethodPrinter {
            text: self.text.push_child(),
            labels: LabelNames::default(),
        })
    }
}

impl ClassConsumer for ClassPrinter {
    fn visit_header(
        &mut self,
        version: u32,
        access: AccessFlags,
        name: &str,
        signature_: Option<&str>,
        super_name: Option<&str>,
        interfaces: &[&str],
    ) -> Result<()> {
        let major = version & 0xFFFF;
        let minor = version >> 16;
        let mut buf = format!("// class version {}.{} ({})\n", major, minor, version);
        if access.contains(AccessFlags::DEPRECATED) {
            buf.push_str("// DEPRECATED\n");
        }
        buf.push_str(&format!("// access flags 0x{:X}\n", access.bits()));
        if let Some(sig) = signature_ {
            buf.push_str(&format!("// signature {}\n", sig));
            buf.push_str(&format!(
                "// declaration: {}{}\n",
                name,
                signature::class_declaration(sig, access.contains(AccessFlags::INTERFACE))?
            ));
        }
        push_access(&mut buf, access & !AccessFlags::SUPER);
        if access.contains(AccessFlags::ANNOTATION) {
            buf.push_str("@interface ");
        } else if access.contains(AccessFlags::INTERFACE) {
            buf.push_str("interface ");
        } else if !access.contains(AccessFlags::ENUM) {
            buf.push_str("class ");
        }
        buf.push_str(name);
        if let Some(super_name) = super_name {
            if super_name != "java/lang/Object" {
                buf.push_str(" extends ");
                buf.push_str(super_name);
                buf.push(' ');
            }
        }
        if !interfaces.is_empty() {
            buf.push_str(" implements ");
            for interface in interfaces {
                buf.push_str(interface);
                buf.push(' ');
            }
        }
        buf.push_str(" {\n\n");
        self.text.push_str(buf);
        Ok(())
    }

    fn visit_source(&mut self, file: Option<&str>, debug: Option<&str>) -> Result<()> {
        let mut buf = String::new();
        if let Some(file) = file {
            buf.push_str(&format!("{}// compiled from: {}\n", TAB, file));
        }
        if let Some(debug) = debug {
            buf.push_str(&format!("{}// debug info: {}\n", TAB, debug));
        }
        if !buf.is_empty() {
            self.text.push_str(buf);
        }
        Ok(())
    }

    fn visit_outer_class(
        &mut self,
        owner: &str,
        name: Option<&str>,
        descriptor: Option<&str>,
    ) -> Result<()> {
        let mut buf = format!("{}OUTERCLASS {}", TAB, owner);
        if let Some(name) = name {
            buf.push(' ');
            buf.push_str(name);
        }
        if let Some(descriptor) = descriptor {
            buf.push(' ');
            buf.push_str(descriptor);
        }
        buf.push('\n');
        self.text.push_str(buf);
        Ok(())
    }

    fn visit_inner_class(
        &mut self,
        name: &str,
        outer_name: Option<&str>,
        inner_name: Option<&str>,
        access: AccessFlags,
    ) -> Result<()> {
        let mut buf = format!(
            "{}// access flags 0x{:X}\n{}",
            TAB,
            (access & !AccessFlags::SUPER).bits(),
            TAB
        );
        push_access(&mut buf, access);
        buf.push_str("INNERCLASS ");
        buf.push_str(name);
        if let Some(outer_name) = outer_name {
            buf.push(' ');
            buf.push_str(outer_name);
        }
        if let Some(inner_name) = inner_name {
            buf.push(' ');
            buf.push_str(inner_name);
        }
        buf.push('\n');
        self.text.push_str(buf);
        Ok(())
    }

    fn visit_annotation(
        &mut self,
        descriptor: &str,
        visible: bool,
    ) -> Result<Box<dyn AnnotationConsumer>> {
        Ok(Box::new(self.begin_annotation(descriptor, visible)))
    }

    fn visit_field(
        &mut self,
        access: AccessFlags,
        name: &str,
        descriptor: &str,
        signature_: Option<&str>,
        value: Option<&Constant>,
    ) -> Result<Box<dyn FieldConsumer>> {
        Ok(Box::new(self.begin_field(
            access, name, descriptor, signature_, value,
        )?))
    }

    fn visit_method(
        &mut self,
        access: AccessFlags,
        name: &str,
        descriptor: &str,
        signature_: Option<&str>,
        exceptions: &[&str],
    ) -> Result<Box<dyn MethodConsumer>> {
        Ok(Box::new(self.begin_method(
            access, name, descriptor, signature_, exceptions,
        )?))
    }

    fn visit_end(&mut self) -> Result<()> {
        self.text.push_str("}\n");
        Ok(())
    }
}

/// Prints the annotations of one field.
pub struct FieldPrinter {
    text: Text,
}

impl FieldPrinter {
    pub(crate) fn begin_annotation(&mut self, descriptor: &str, visible: bool) -> AnnotationPrinter {
        annotation_block(&self.text, TAB, descriptor, visible)
    }
}

impl FieldConsumer for FieldPrinter {
    fn visit_annotation(
        &mut self,
        descriptor: &str,
        visible: bool,
    ) -> Result<Box<dyn AnnotationConsumer>> {
        Ok(Box::new(self.begin_annotation(descriptor, visible)))
    }

    fn visit_end(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Prints the body of one method: annotations, instructions, and metadata.
pub struct MethodPrinter {
    text: Text,
    labels: LabelNames,
}

impl MethodPrinter {
    fn push_frame_types(&mut self, out: &mut String, types: &[VerificationType]) {
        for (i, vtype) in types.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            match vtype {
                VerificationType::Top => out.push_str("TOP"),
                VerificationType::Integer => out.push_str("INTEGER"),
                VerificationType::Float => out.push_str("FLOAT"),
                VerificationType::Double => out.push_str("DOUBLE"),
                VerificationType::Long => out.push_str("LONG"),
                VerificationType::Null => out.push_str("NULL"),
                VerificationType::UninitializedThis => out.push_str("UNINITIALIZED_THIS"),
                VerificationType::Object(name) => out.push_str(name),
                VerificationType::Uninitialized(label) => self.labels.push(out, *label),
            }
        }
    }

    fn push_handle(&mut self, out: &mut String, handle: &Handle) {
        out.push('\n');
        out.push_str(TAB3);
        out.push_str(&format!(
            "// handle kind 0x{:x} : {}\n",
            handle.kind.tag(),
            handle.kind.mnemonic()
        ));
        out.push_str(TAB3);
        out.push_str(&handle.owner);
        out.push('.');
        out.push_str(&handle.name);
        out.push('(');
        out.push_str(&handle.descriptor);
        out.push_str(")\n");
    }

    fn mnemonic(opcode: u8) -> &'static str {
        opcodes::mnemonic(opcode).unwrap_or("UNKNOWN")
    }
}

impl MethodConsumer for MethodPrinter {
    fn visit_annotation(
        &mut self,
        descriptor: &str,
        visible: bool,
    ) -> Result<Box<dyn AnnotationConsumer>> {
        Ok(Box::new(annotation_block(
            &self.text, TAB, descriptor, visible,
        )))
    }

    fn visit_annotation_default(&mut self) -> Result<Box<dyn AnnotationConsumer>> {
        self.text.push_str(format!("{}default=", TAB2));
        let child = self.text.push_child();
        self.text.push_str("\n");
        Ok(Box::new(AnnotationPrinter {
            text: child,
            value_count: 0,
        }))
    }

    fn visit_parameter_annotation(
        &mut self,
        parameter: u32,
        descriptor: &str,
        visible: bool,
    ) -> Result<Box<dyn AnnotationConsumer>> {
        self.text.push_str(format!("{}@{}(", TAB2, descriptor));
        let child = self.text.push_child();
        let closing = if visible {
            ") // parameter "
        } else {
            ") // invisible, parameter "
        };
        self.text.push_str(format!("{}{}\n", closing, parameter));
        Ok(Box::new(AnnotationPrinter {
            text: child,
            value_count: 0,
        }))
    }

    fn visit_code(&mut self) -> Result<()> {
        Ok(())
    }

    fn visit_frame(&mut self, frame: &StackFrame) -> Result<()> {
        let mut buf = format!("{}FRAME ", LTAB);
        match frame {
            StackFrame::Full { locals, stack } | StackFrame::New { locals, stack } => {
                buf.push_str("FULL [");
                self.push_frame_types(&mut buf, locals);
                buf.push_str("] [");
                self.push_frame_types(&mut buf, stack);
                buf.push(']');
            }
            StackFrame::Append(locals) => {
                buf.push_str("APPEND [");
                self.push_frame_types(&mut buf, locals);
                buf.push(']');
            }
            StackFrame::Chop(count) => {
                buf.push_str(&format!("CHOP {}", count));
            }
            StackFrame::Same => buf.push_str("SAME"),
            StackFrame::Same1(vtype) => {
                buf.push_str("SAME1 ");
                self.push_frame_types(&mut buf, std::slice::from_ref(vtype));
            }
        }
        buf.push('\n');
        self.text.push_str(buf);
        Ok(())
    }

    fn visit_insn(&mut self, opcode: u8) -> Result<()> {
        self.text
            .push_str(format!("{}{}\n", TAB2, Self::mnemonic(opcode)));
        Ok(())
    }

    fn visit_int_insn(&mut self, opcode: u8, operand: i32) -> Result<()> {
        let mut buf = format!("{}{} ", TAB2, Self::mnemonic(opcode));
        if opcode == opcodes::NEWARRAY {
            match opcodes::array_type(operand) {
                Some(name) => buf.push_str(name),
                None => buf.push_str(&operand.to_string()),
            }
        } else {
            buf.push_str(&operand.to_string());
        }
        buf.push('\n');
        self.text.push_str(buf);
        Ok(())
    }

    fn visit_var_insn(&mut self, opcode: u8, var: i32) -> Result<()> {
        self.text
            .push_str(format!("{}{} {}\n", TAB2, Self::mnemonic(opcode), var));
        Ok(())
    }

    fn visit_type_insn(&mut self, opcode: u8, type_name: &str) -> Result<()> {
        self.text
            .push_str(format!("{}{} {}\n", TAB2, Self::mnemonic(opcode), type_name));
        Ok(())
    }

    fn visit_field_insn(
        &mut self,
        opcode: u8,
        owner: &str,
        name: &str,
        descriptor: &str,
    ) -> Result<()> {
        self.text.push_str(format!(
            "{}{} {}.{} : {}\n",
            TAB2,
            Self::mnemonic(opcode),
            owner,
            name,
            descriptor
        ));
        Ok(())
    }

    fn visit_method_insn(
        &mut self,
        opcode: u8,
        owner: &str,
        name: &str,
        descriptor: &str,
    ) -> Result<()> {
        self.text.push_str(format!(
            "{}{} {}.{} {}\n",
            TAB2,
            Self::mnemonic(opcode),
            owner,
            name,
            descriptor
        ));
        Ok(())
    }

    fn visit_invoke_dynamic(
        &mut self,
        name: &str,
        descriptor: &str,
        bootstrap: &Handle,
        arguments: &[BootstrapArgument],
    ) -> Result<()> {
        let mut buf = format!("{}INVOKEDYNAMIC {}{} [", TAB2, name, descriptor);
        self.push_handle(&mut buf, bootstrap);
        buf.push_str(TAB3);
        buf.push_str("// arguments:");
        if arguments.is_empty() {
            buf.push_str(" none");
        } else {
            buf.push('\n');
            buf.push_str(TAB3);
            for (i, argument) in arguments.iter().enumerate() {
                if i > 0 {
                    buf.push_str(", ");
                }
                match argument {
                    BootstrapArgument::Constant(constant) => push_constant(&mut buf, constant),
                    BootstrapArgument::Handle(handle) => self.push_handle(&mut buf, handle),
                }
            }
        }
        buf.push('\n');
        buf.push_str(TAB2);
        buf.push_str("]\n");
        self.text.push_str(buf);
        Ok(())
    }

    fn visit_jump_insn(&mut self, opcode: u8, label: Label) -> Result<()> {
        let mut buf = format!("{}{} ", TAB2, Self::mnemonic(opcode));
        self.labels.push(&mut buf, label);
        buf.push('\n');
        self.text.push_str(buf);
        Ok(())
    }

    fn visit_label(&mut self, label: Label) -> Result<()> {
        let mut buf = String::from(LTAB);
        self.labels.push(&mut buf, label);
        buf.push('\n');
        self.text.push_str(buf);
        Ok(())
    }

    fn visit_ldc_insn(&mut self, constant: &Constant) -> Result<()> {
        let mut buf = format!("{}LDC ", TAB2);
        push_constant(&mut buf, constant);
        buf.push('\n');
        self.text.push_str(buf);
        Ok(())
    }

    fn visit_iinc_insn(&mut self, var: i32, increment: i32) -> Result<()> {
        self.text
            .push_str(format!("{}IINC {} {}\n", TAB2, var, increment));
        Ok(())
    }

    fn visit_table_switch(
        &mut self,
        min: i32,
        _max: i32,
        default: Label,
        labels: &[Label],
    ) -> Result<()> {
        let mut buf = format!("{}TABLESWITCH\n", TAB2);
        for (i, label) in labels.iter().enumerate() {
            buf.push_str(&format!("{}{}: ", TAB3, min + i as i32));
            self.labels.push(&mut buf, *label);
            buf.push('\n');
        }
        buf.push_str(TAB3);
        buf.push_str("default: ");
        self.labels.push(&mut buf, default);
        buf.push('\n');
        self.text.push_str(buf);
        Ok(())
    }

    fn visit_lookup_switch(
        &mut self,
        default: Label,
        keys: &[i32],
        labels: &[Label],
    ) -> Result<()> {
        let mut buf = format!("{}LOOKUPSWITCH\n", TAB2);
        for (key, label) in keys.iter().zip(labels) {
            buf.push_str(&format!("{}{}: ", TAB3, key));
            self.labels.push(&mut buf, *label);
            buf.push('\n');
        }
        buf.push_str(TAB3);
        buf.push_str("default: ");
        self.labels.push(&mut buf, default);
        buf.push('\n');
        self.text.push_str(buf);
        Ok(())
    }

    fn visit_multi_new_array(&mut self, descriptor: &str, dimensions: i32) -> Result<()> {
        self.text.push_str(format!(
            "{}MULTIANEWARRAY {} {}\n",
            TAB2, descriptor, dimensions
        ));
        Ok(())
    }

    fn visit_try_catch(
        &mut self,
        start: Label,
        end: Label,
        handler: Label,
        catch_type: Option<&str>,
    ) -> Result<()> {
        let mut buf = format!("{}TRYCATCHBLOCK ", TAB2);
        self.labels.push(&mut buf, start);
        buf.push(' ');
        self.labels.push(&mut buf, end);
        buf.push(' ');
        self.labels.push(&mut buf, handler);
        if let Some(catch_type) = catch_type {
            buf.push(' ');
            buf.push_str(catch_type);
        }
        buf.push('\n');
        self.text.push_str(buf);
        Ok(())
    }

    fn visit_local_variable(
        &mut self,
        name: &str,
        descriptor: &str,
        signature_: Option<&str>,
        start: Label,
        end: Label,
        index: i32,
    ) -> Result<()> {
        let mut buf = format!("{}LOCALVARIABLE {} {} ", TAB2, name, descriptor);
        self.labels.push(&mut buf, start);
        buf.push(' ');
        self.labels.push(&mut buf, end);
        buf.push_str(&format!(" {}\n", index));
        if let Some(sig) = signature_ {
            buf.push_str(&format!("{}// signature {}\n", TAB2, sig));
            buf.push_str(&format!(
                "{}// declaration: {}\n",
                TAB2,
                signature::type_declaration(sig)?
            ));
        }
        self.text.push_str(buf);
        Ok(())
    }

    fn visit_line_number(&mut self, line: i32, start: Label) -> Result<()> {
        let mut buf = format!("{}LINENUMBER {} ", TAB2, line);
        self.labels.push(&mut buf, start);
        buf.push('\n');
        self.text.push_str(buf);
        Ok(())
    }

    fn visit_maxs(&mut self, max_stack: i32, max_locals: i32) -> Result<()> {
        self.text.push_str(format!(
            "{}MAXSTACK = {}\n{}MAXLOCALS = {}\n",
            TAB2, max_stack, TAB2, max_locals
        ));
        Ok(())
    }

    fn visit_end(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Prints the values of one annotation scope as a comma-separated list.
pub struct AnnotationPrinter {
    text: Text,
    value_count: usize,
}

/// Opens an `@<descriptor>(...)` block on `parent` and returns the printer
/// for the value list spliced between the parentheses.
fn annotation_block(parent: &Text, indent: &str, descriptor: &str, visible: bool) -> AnnotationPrinter {
    parent.push_str(format!("{}@{}(", indent, descriptor));
    let child = parent.push_child();
    parent.push_str(if visible { ")\n" } else { ") // invisible\n" });
    AnnotationPrinter {
        text: child,
        value_count: 0,
    }
}

impl AnnotationPrinter {
    fn lead_in(&mut self, name: Option<&str>) -> String {
        let mut buf = String::new();
        if self.value_count > 0 {
            buf.push_str(", ");
        }
        self.value_count += 1;
        if let Some(name) = name {
            buf.push_str(name);
            buf.push('=');
        }
        buf
    }

    fn push_primitives<T, F>(buf: &mut String, values: &[T], mut push_one: F)
    where
        F: FnMut(&mut String, &T),
    {
        buf.push('{');
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                buf.push_str(", ");
            }
            push_one(buf, value);
        }
        buf.push('}');
    }
}

impl AnnotationConsumer for AnnotationPrinter {
    fn visit_value(&mut self, name: Option<&str>, value: &AnnotationValue) -> Result<()> {
        let mut buf = self.lead_in(name);
        match value {
            AnnotationValue::Boolean(v) => buf.push_str(&v.to_string()),
            AnnotationValue::Byte(v) => buf.push_str(&format!("(byte){}", v)),
            AnnotationValue::Char(v) => buf.push_str(&format!("(char){}", *v as u32)),
            AnnotationValue::Short(v) => buf.push_str(&format!("(short){}", v)),
            AnnotationValue::Int(v) => buf.push_str(&v.to_string()),
            AnnotationValue::Long(v) => buf.push_str(&format!("{}L", v)),
            AnnotationValue::Float(v) => buf.push_str(&format!("{:?}F", v)),
            AnnotationValue::Double(v) => buf.push_str(&format!("{:?}D", v)),
            AnnotationValue::Str(v) => push_quoted(&mut buf, v),
            AnnotationValue::Class(descriptor) => {
                buf.push_str(descriptor);
                buf.push_str(".class");
            }
            AnnotationValue::BooleanArray(vs) => {
                Self::push_primitives(&mut buf, vs, |b, v| b.push_str(&v.to_string()))
            }
            AnnotationValue::ByteArray(vs) => {
                Self::push_primitives(&mut buf, vs, |b, v| b.push_str(&format!("(byte){}", v)))
            }
            AnnotationValue::CharArray(vs) => Self::push_primitives(&mut buf, vs, |b, v| {
                b.push_str(&format!("(char){}", *v as u32))
            }),
            AnnotationValue::ShortArray(vs) => {
                Self::push_primitives(&mut buf, vs, |b, v| b.push_str(&format!("(short){}", v)))
            }
            AnnotationValue::IntArray(vs) => {
                Self::push_primitives(&mut buf, vs, |b, v| b.push_str(&v.to_string()))
            }
            AnnotationValue::LongArray(vs) => {
                Self::push_primitives(&mut buf, vs, |b, v| b.push_str(&format!("{}L", v)))
            }
            AnnotationValue::FloatArray(vs) => {
                Self::push_primitives(&mut buf, vs, |b, v| b.push_str(&format!("{:?}F", v)))
            }
            AnnotationValue::DoubleArray(vs) => {
                Self::push_primitives(&mut buf, vs, |b, v| b.push_str(&format!("{:?}D", v)))
            }
        }
        self.text.push_str(buf);
        Ok(())
    }

    fn visit_enum(&mut self, name: Option<&str>, descriptor: &str, value: &str) -> Result<()> {
        let mut buf = self.lead_in(name);
        buf.push_str(descriptor);
        buf.push('.');
        buf.push_str(value);
        self.text.push_str(buf);
        Ok(())
    }

    fn visit_nested(
        &mut self,
        name: Option<&str>,
        descriptor: &str,
    ) -> Result<Box<dyn AnnotationConsumer>> {
        let mut buf = self.lead_in(name);
        buf.push('@');
        buf.push_str(descriptor);
        buf.push('(');
        self.text.push_str(buf);
        let child = self.text.push_child();
        self.text.push_str(")");
        Ok(Box::new(AnnotationPrinter {
            text: child,
            value_count: 0,
        }))
    }

    fn visit_array(&mut self, name: Option<&str>) -> Result<Box<dyn AnnotationConsumer>> {
        let mut buf = self.lead_in(name);
        buf.push('{');
        self.text.push_str(buf);
        let child = self.text.push_child();
        self.text.push_str("}");
        Ok(Box::new(AnnotationPrinter {
            text: child,
            value_count: 0,
        }))
    }

    fn visit_end(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::event::{HandleKind, LabelGenerator};

    fn contains_in_order(haystack: &str, needles: &[&str]) {
        let mut from = 0;
        for needle in needles {
            match haystack[from..].find(needle) {
                Some(at) => from += at + needle.len(),
                None => panic!("{:?} not found (in order) in:\n{}", needle, haystack),
            }
        }
    }

    #[test]
    fn class_header() {
        let mut printer = ClassPrinter::new();
        printer
            .visit_header(
                50,
                AccessFlags::PUBLIC | AccessFlags::SUPER,
                "Hello",
                None,
                Some("java/lang/Object"),
                &[],
            )
            .unwrap();
        printer.visit_end().unwrap();

        let out = printer.render();
        contains_in_order(&out, &["// class version 50.0 (50)", "public class Hello {"]);
        assert!(out.ends_with("}\n"));
        // SUPER is not a printable modifier
        assert!(!out.contains("synchronized"));
    }

    #[test]
    fn interface_and_annotation_keywords() {
        let mut printer = ClassPrinter::new();
        printer
            .visit_header(
                49,
                AccessFlags::INTERFACE | AccessFlags::ABSTRACT,
                "Greeter",
                None,
                Some("java/lang/Object"),
                &["java/lang/AutoCloseable"],
            )
            .unwrap();
        let out = printer.render();
        contains_in_order(
            &out,
            &["abstract interface Greeter", "implements java/lang/AutoCloseable"],
        );

        let mut printer = ClassPrinter::new();
        printer
            .visit_header(
                49,
                AccessFlags::ANNOTATION | AccessFlags::INTERFACE | AccessFlags::ABSTRACT,
                "Marker",
                None,
                Some("java/lang/Object"),
                &[],
            )
            .unwrap();
        assert!(printer.render().contains("@interface Marker"));
    }

    #[test]
    fn class_signature_declaration_comment() {
        let mut printer = ClassPrinter::new();
        printer
            .visit_header(
                50,
                AccessFlags::PUBLIC | AccessFlags::SUPER,
                "Box",
                Some("<T:Ljava/lang/Object;>Ljava/lang/Object;"),
                Some("java/lang/Object"),
                &[],
            )
            .unwrap();
        let out = printer.render();
        contains_in_order(
            &out,
            &[
                "// signature <T:Ljava/lang/Object;>Ljava/lang/Object;",
                "// declaration: Box<T>",
            ],
        );
    }

    #[test]
    fn field_with_initial_value() {
        let mut printer = ClassPrinter::new();
        printer
            .visit_header(49, AccessFlags::SUPER, "Hello", None, Some("java/lang/Object"), &[])
            .unwrap();
        let mut field = printer
            .begin_field(
                AccessFlags::PRIVATE | AccessFlags::STATIC | AccessFlags::FINAL,
                "GREETING",
                "Ljava/lang/String;",
                None,
                Some(&Constant::Str(String::from("hi"))),
            )
            .unwrap();
        field.visit_end().unwrap();
        printer.visit_end().unwrap();

        let out = printer.render();
        contains_in_order(
            &out,
            &[
                "// access flags 0x1A",
                "private final static Ljava/lang/String; GREETING = \"hi\"",
            ],
        );
    }

    #[test]
    fn method_body_event_order() {
        let mut printer = ClassPrinter::new();
        printer
            .visit_header(50, AccessFlags::PUBLIC | AccessFlags::SUPER, "Hello", None, Some("java/lang/Object"), &[])
            .unwrap();
        let mut method = printer
            .begin_method(
                AccessFlags::PUBLIC | AccessFlags::STATIC,
                "main",
                "([Ljava/lang/String;)V",
                None,
                &[],
            )
            .unwrap();
        method.visit_code().unwrap();
        method
            .visit_field_insn(
                opcodes::GETSTATIC,
                "java/lang/System",
                "out",
                "Ljava/io/PrintStream;",
            )
            .unwrap();
        method
            .visit_ldc_insn(&Constant::Str(String::from("hello")))
            .unwrap();
        method
            .visit_method_insn(
                opcodes::INVOKEVIRTUAL,
                "java/io/PrintStream",
                "println",
                "(Ljava/lang/String;)V",
            )
            .unwrap();
        method.visit_insn(opcodes::RETURN).unwrap();
        method.visit_maxs(2, 1).unwrap();
        method.visit_end().unwrap();
        printer.visit_end().unwrap();

        contains_in_order(
            &printer.render(),
            &[
                "public static main([Ljava/lang/String;)V",
                "GETSTATIC java/lang/System.out : Ljava/io/PrintStream;",
                "LDC \"hello\"",
                "INVOKEVIRTUAL java/io/PrintStream.println (Ljava/lang/String;)V",
                "RETURN",
                "MAXSTACK = 2",
                "MAXLOCALS = 1",
            ],
        );
    }

    #[test]
    fn labels_are_named_in_first_reference_order() {
        let mut labels = LabelGenerator::new();
        let target = labels.fresh_label();
        let other = labels.fresh_label();

        let mut printer = ClassPrinter::new();
        let mut method = printer
            .begin_method(AccessFlags::empty(), "f", "()V", None, &[])
            .unwrap();
        method.visit_jump_insn(opcodes::GOTO, target).unwrap();
        method.visit_label(other).unwrap();
        method.visit_label(target).unwrap();
        method.visit_jump_insn(opcodes::IFNULL, other).unwrap();

        let out = printer.render();
        // first reference wins the name, repeated references keep it
        contains_in_order(&out, &["GOTO L0", "L1\n", "L0\n", "IFNULL L1"]);
    }

    #[test]
    fn table_switch_rendering() {
        let mut labels = LabelGenerator::new();
        let a = labels.fresh_label();
        let b = labels.fresh_label();
        let c = labels.fresh_label();
        let d = labels.fresh_label();

        let mut printer = ClassPrinter::new();
        let mut method = printer
            .begin_method(AccessFlags::empty(), "f", "(I)V", None, &[])
            .unwrap();
        method.visit_table_switch(0, 2, d, &[a, b, c]).unwrap();

        let out = printer.render();
        contains_in_order(
            &out,
            &["TABLESWITCH", "0: L0", "1: L1", "2: L2", "default: L3"],
        );
        assert_eq!(out.matches(": L").count(), 4);
    }

    #[test]
    fn lookup_switch_and_newarray() {
        let mut labels = LabelGenerator::new();
        let a = labels.fresh_label();
        let d = labels.fresh_label();

        let mut printer = ClassPrinter::new();
        let mut method = printer
            .begin_method(AccessFlags::empty(), "f", "(I)V", None, &[])
            .unwrap();
        method.visit_lookup_switch(d, &[42], &[a]).unwrap();
        method
            .visit_int_insn(opcodes::NEWARRAY, opcodes::T_BOOLEAN)
            .unwrap();

        contains_in_order(
            &printer.render(),
            &["LOOKUPSWITCH", "42: L0", "default: L1", "NEWARRAY T_BOOLEAN"],
        );
    }

    #[test]
    fn frame_rendering() {
        let mut printer = ClassPrinter::new();
        let mut method = printer
            .begin_method(AccessFlags::empty(), "f", "()V", None, &[])
            .unwrap();
        method
            .visit_frame(&StackFrame::Full {
                locals: vec![
                    VerificationType::Object(String::from("Hello")),
                    VerificationType::Integer,
                ],
                stack: vec![VerificationType::Long],
            })
            .unwrap();
        method
            .visit_frame(&StackFrame::Append(vec![VerificationType::Top]))
            .unwrap();
        method.visit_frame(&StackFrame::Chop(2)).unwrap();
        method.visit_frame(&StackFrame::Same).unwrap();
        method
            .visit_frame(&StackFrame::Same1(VerificationType::Null))
            .unwrap();

        contains_in_order(
            &printer.render(),
            &[
                "FRAME FULL [Hello INTEGER] [LONG]",
                "FRAME APPEND [TOP]",
                "FRAME CHOP 2",
                "FRAME SAME\n",
                "FRAME SAME1 NULL",
            ],
        );
    }

    #[test]
    fn ldc_constant_suffixes() {
        let mut printer = ClassPrinter::new();
        let mut method = printer
            .begin_method(AccessFlags::empty(), "f", "()V", None, &[])
            .unwrap();
        method.visit_ldc_insn(&Constant::Int(7)).unwrap();
        method.visit_ldc_insn(&Constant::Long(7)).unwrap();
        method.visit_ldc_insn(&Constant::Float(2.0)).unwrap();
        method.visit_ldc_insn(&Constant::Double(2.5)).unwrap();
        method
            .visit_ldc_insn(&Constant::Class(String::from("Ljava/lang/String;")))
            .unwrap();

        contains_in_order(
            &printer.render(),
            &[
                "LDC 7\n",
                "LDC 7L\n",
                "LDC 2.0F\n",
                "LDC 2.5D\n",
                "LDC Ljava/lang/String;.class\n",
            ],
        );
    }

    #[test]
    fn invoke_dynamic_rendering() {
        let mut printer = ClassPrinter::new();
        let mut method = printer
            .begin_method(AccessFlags::empty(), "f", "()V", None, &[])
            .unwrap();
        let bootstrap = Handle::new(
            HandleKind::InvokeStatic,
            "java/lang/invoke/LambdaMetafactory",
            "metafactory",
            "()V",
        );
        method
            .visit_invoke_dynamic(
                "run",
                "()Ljava/lang/Runnable;",
                &bootstrap,
                &[BootstrapArgument::Constant(Constant::Str(String::from(
                    "x",
                )))],
            )
            .unwrap();

        contains_in_order(
            &printer.render(),
            &[
                "INVOKEDYNAMIC run()Ljava/lang/Runnable; [",
                "// handle kind 0x6 : INVOKESTATIC",
                "java/lang/invoke/LambdaMetafactory.metafactory(()V)",
                "// arguments:",
                "\"x\"",
                "]",
            ],
        );
    }

    #[test]
    fn annotation_values() {
        let mut printer = ClassPrinter::new();
        let mut annotation = printer.begin_annotation("LMarked;", true);
        annotation
            .visit_value(Some("count"), &AnnotationValue::Int(3))
            .unwrap();
        annotation
            .visit_enum(Some("level"), "LLevel;", "HIGH")
            .unwrap();
        let mut array = annotation.visit_array(Some("names")).unwrap();
        array
            .visit_value(None, &AnnotationValue::Str(String::from("a")))
            .unwrap();
        array
            .visit_value(None, &AnnotationValue::Str(String::from("b")))
            .unwrap();
        array.visit_end().unwrap();
        annotation.visit_end().unwrap();

        assert!(printer
            .render()
            .contains("@LMarked;(count=3, level=LLevel;.HIGH, names={\"a\", \"b\"})"));
    }

    #[test]
    fn invisible_annotation_comment() {
        let mut printer = ClassPrinter::new();
        let mut annotation = printer.begin_annotation("LHidden;", false);
        annotation
            .visit_value(Some("value"), &AnnotationValue::Byte(1))
            .unwrap();
        annotation.visit_end().unwrap();

        assert!(printer
            .render()
            .contains("@LHidden;(value=(byte)1) // invisible"));
    }

    #[test]
    fn deprecated_member_comment() {
        let mut printer = ClassPrinter::new();
        printer
            .begin_field(
                AccessFlags::PUBLIC | AccessFlags::DEPRECATED,
                "old",
                "I",
                None,
                None,
            )
            .unwrap();
        contains_in_order(&printer.render(), &["// DEPRECATED", "public I old"]);
    }

    #[test]
    fn method_signature_declaration_comment() {
        let mut printer = ClassPrinter::new();
        printer
            .begin_method(
                AccessFlags::PUBLIC,
                "pick",
                "(Ljava/lang/Object;I)Ljava/lang/Object;",
                Some("<T:Ljava/lang/Object;>(TT;I)TT;^Ljava/io/IOException;"),
                &["java/io/IOException"],
            )
            .unwrap();
        contains_in_order(
            &printer.render(),
            &[
                "// declaration: T pick<T>(T, int) throws java.io.IOException",
                "public pick(Ljava/lang/Object;I)Ljava/lang/Object; throws java/io/IOException",
            ],
        );
    }
}
