//! Generator-source emitters
//!
//! The mirror image of [`crate::printer`]: instead of a disassembly listing,
//! each event renders a Rust statement that replays the same event against a
//! consumer named `cw` (class), `fv` (field), `mv` (method), or `avN`
//! (annotation, numbered by nesting depth). Feeding the emitted source to an
//! event consumer reproduces the visited structure.
//!
//! Constants are rendered as constructor expressions, not display values, so
//! every fragment is itself parseable. Labels get their own name table
//! (`l0`, `l1`, ...) with a declaration statement on first reference;
//! emitters and printers never share label state.

use crate::errors::Result;
use crate::event::{
    AccessFlags, AnnotationConsumer, AnnotationValue, BootstrapArgument, ClassConsumer, Constant,
    FieldConsumer, Handle, Label, MethodConsumer, StackFrame, VerificationType,
};
use crate::opcodes;
use crate::text::Text;
use std::collections::HashMap;

#[derive(Copy, Clone)]
enum FlagContext {
    Class,
    Field,
    Method,
}

fn flags_expr(access: AccessFlags, context: FlagContext) -> String {
    let names: &[(AccessFlags, &str)] = match context {
        FlagContext::Class => &[
            (AccessFlags::PUBLIC, "PUBLIC"),
            (AccessFlags::PRIVATE, "PRIVATE"),
            (AccessFlags::PROTECTED, "PROTECTED"),
            (AccessFlags::STATIC, "STATIC"),
            (AccessFlags::FINAL, "FINAL"),
            (AccessFlags::SUPER, "SUPER"),
            (AccessFlags::INTERFACE, "INTERFACE"),
            (AccessFlags::ABSTRACT, "ABSTRACT"),
            (AccessFlags::SYNTHETIC, "SYNTHETIC"),
            (AccessFlags::ANNOTATION, "ANNOTATION"),
            (AccessFlags::ENUM, "ENUM"),
            (AccessFlags::DEPRECATED, "DEPRECATED"),
        ],
        FlagContext::Field => &[
            (AccessFlags::PUBLIC, "PUBLIC"),
            (AccessFlags::PRIVATE, "PRIVATE"),
            (AccessFlags::PROTECTED, "PROTECTED"),
            (AccessFlags::STATIC, "STATIC"),
            (AccessFlags::FINAL, "FINAL"),
            (AccessFlags::VOLATILE, "VOLATILE"),
            (AccessFlags::TRANSIENT, "TRANSIENT"),
            (AccessFlags::SYNTHETIC, "SYNTHETIC"),
            (AccessFlags::ENUM, "ENUM"),
            (AccessFlags::DEPRECATED, "DEPRECATED"),
        ],
        FlagContext::Method => &[
            (AccessFlags::PUBLIC, "PUBLIC"),
            (AccessFlags::PRIVATE, "PRIVATE"),
            (AccessFlags::PROTECTED, "PROTECTED"),
            (AccessFlags::STATIC, "STATIC"),
            (AccessFlags::FINAL, "FINAL"),
            (AccessFlags::SYNCHRONIZED, "SYNCHRONIZED"),
            (AccessFlags::BRIDGE, "BRIDGE"),
            (AccessFlags::VARARGS, "VARARGS"),
            (AccessFlags::NATIVE, "NATIVE"),
            (AccessFlags::ABSTRACT, "ABSTRACT"),
            (AccessFlags::STRICT, "STRICT"),
            (AccessFlags::SYNTHETIC, "SYNTHETIC"),
            (AccessFlags::DEPRECATED, "DEPRECATED"),
        ],
    };
    let parts: Vec<String> = names
        .iter()
        .filter(|(flag, _)| access.contains(*flag))
        .map(|(_, name)| format!("AccessFlags::{}", name))
        .collect();
    if parts.is_empty() {
        String::from("AccessFlags::empty()")
    } else {
        parts.join(" | ")
    }
}

fn opt_str(value: Option<&str>) -> String {
    match value {
        Some(value) => format!("Some({:?})", value),
        None => String::from("None"),
    }
}

fn str_slice(items: &[&str]) -> String {
    if items.is_empty() {
        return String::from("&[]");
    }
    let quoted: Vec<String> = items.iter().map(|item| format!("{:?}", item)).collect();
    format!("&[{}]", quoted.join(", "))
}

fn constant_expr(constant: &Constant) -> String {
    match constant {
        Constant::Int(value) => format!("Constant::Int({})", value),
        Constant::Float(value) => format!("Constant::Float({:?})", value),
        Constant::Long(value) => format!("Constant::Long({})", value),
        Constant::Double(value) => format!("Constant::Double({:?})", value),
        Constant::Str(value) => format!("Constant::Str(String::from({:?}))", value),
        Constant::Class(descriptor) => {
            format!("Constant::Class(String::from({:?}))", descriptor)
        }
    }
}

fn handle_expr(handle: &Handle) -> String {
    format!(
        "Handle::new(HandleKind::{}, {:?}, {:?}, {:?})",
        handle.kind.variant_name(),
        handle.owner,
        handle.name,
        handle.descriptor
    )
}

fn value_expr(value: &AnnotationValue) -> String {
    fn seq<T, F: Fn(&T) -> String>(values: &[T], one: F) -> String {
        let parts: Vec<String> = values.iter().map(one).collect();
        format!("vec![{}]", parts.join(", "))
    }
    match value {
        AnnotationValue::Boolean(v) => format!("AnnotationValue::Boolean({})", v),
        AnnotationValue::Byte(v) => format!("AnnotationValue::Byte({})", v),
        AnnotationValue::Char(v) => format!("AnnotationValue::Char({:?})", v),
        AnnotationValue::Short(v) => format!("AnnotationValue::Short({})", v),
        AnnotationValue::Int(v) => format!("AnnotationValue::Int({})", v),
        AnnotationValue::Long(v) => format!("AnnotationValue::Long({})", v),
        AnnotationValue::Float(v) => format!("AnnotationValue::Float({:?})", v),
        AnnotationValue::Double(v) => format!("AnnotationValue::Double({:?})", v),
        AnnotationValue::Str(v) => format!("AnnotationValue::Str(String::from({:?}))", v),
        AnnotationValue::Class(v) => format!("AnnotationValue::Class(String::from({:?}))", v),
        AnnotationValue::BooleanArray(vs) => format!(
            "AnnotationValue::BooleanArray({})",
            seq(vs, |v| v.to_string())
        ),
        AnnotationValue::ByteArray(vs) => {
            format!("AnnotationValue::ByteArray({})", seq(vs, |v| v.to_string()))
        }
        AnnotationValue::CharArray(vs) => format!(
            "AnnotationValue::CharArray({})",
            seq(vs, |v| format!("{:?}", v))
        ),
        AnnotationValue::ShortArray(vs) => format!(
            "AnnotationValue::ShortArray({})",
            seq(vs, |v| v.to_string())
        ),
        AnnotationValue::IntArray(vs) => {
            format!("AnnotationValue::IntArray({})", seq(vs, |v| v.to_string()))
        }
        AnnotationValue::LongArray(vs) => {
            format!("AnnotationValue::LongArray({})", seq(vs, |v| v.to_string()))
        }
        AnnotationValue::FloatArray(vs) => format!(
            "AnnotationValue::FloatArray({})",
            seq(vs, |v| format!("{:?}", v))
        ),
        AnnotationValue::DoubleArray(vs) => format!(
            "AnnotationValue::DoubleArray({})",
            seq(vs, |v| format!("{:?}", v))
        ),
    }
}

/// Emits source that replays a whole class against a consumer named `cw`.
#[derive(Default)]
pub struct ClassEmitter {
    text: Text,
}

impl ClassEmitter {
    pub fn new() -> ClassEmitter {
        ClassEmitter { text: Text::new() }
    }

    /// Handle on the underlying tree; shares state with this emitter.
    pub fn text(&self) -> Text {
        self.text.clone()
    }

    /// Emitted source; complete only after the class scope has ended.
    pub fn render(&self) -> String {
        self.text.render()
    }
}

impl ClassConsumer for ClassEmitter {
    fn visit_header(
        &mut self,
        version: u32,
        access: AccessFlags,
        name: &str,
        signature_: Option<&str>,
        super_name: Option<&str>,
        interfaces: &[&str],
    ) -> Result<()> {
        self.text.push_str(format!(
            "cw.visit_header({}, {}, {:?}, {}, {}, {})?;\n",
            version,
            flags_expr(access, FlagContext::Class),
            name,
            opt_str(signature_),
            opt_str(super_name),
            str_slice(interfaces)
        ));
        Ok(())
    }

    fn visit_source(&mut self, file: Option<&str>, debug: Option<&str>) -> Result<()> {
        self.text.push_str(format!(
            "cw.visit_source({}, {})?;\n",
            opt_str(file),
            opt_str(debug)
        ));
        Ok(())
    }

    fn visit_outer_class(
        &mut self,
        owner: &str,
        name: Option<&str>,
        descriptor: Option<&str>,
    ) -> Result<()> {
        self.text.push_str(format!(
            "cw.visit_outer_class({:?}, {}, {})?;\n",
            owner,
            opt_str(name),
            opt_str(descriptor)
        ));
        Ok(())
    }

    fn visit_inner_class(
        &mut self,
        name: &str,
        outer_name: Option<&str>,
        inner_name: Option<&str>,
        access: AccessFlags,
    ) -> Result<()> {
        self.text.push_str(format!(
            "cw.visit_inner_class({:?}, {}, {}, {})?;\n",
            name,
            opt_str(outer_name),
            opt_str(inner_name),
            flags_expr(access, FlagContext::Class)
        ));
        Ok(())
    }

    fn visit_annotation(
        &mut self,
        descriptor: &str,
        visible: bool,
    ) -> Result<Box<dyn AnnotationConsumer>> {
        Ok(Box::new(annotation_block(
            &self.text,
            "cw",
            &format!("visit_annotation({:?}, {})", descriptor, visible),
            0,
        )))
    }

    fn visit_field(
        &mut self,
        access: AccessFlags,
        name: &str,
        descriptor: &str,
        signature_: Option<&str>,
        value: Option<&Constant>,
    ) -> Result<Box<dyn FieldConsumer>> {
        let value_arg = match value {
            Some(value) => format!("Some(&{})", constant_expr(value)),
            None => String::from("None"),
        };
        self.text.push_str(format!(
            "{{\nlet mut fv = cw.visit_field({}, {:?}, {:?}, {}, {})?;\n",
            flags_expr(access, FlagContext::Field),
            name,
            descriptor,
            opt_str(signature_),
            value_arg
        ));
        let child = self.text.push_child();
        self.text.push_str("}\n");
        Ok(Box::new(FieldEmitter { text: child }))
    }

    fn visit_method(
        &mut self,
        access: AccessFlags,
        name: &str,
        descriptor: &str,
        signature_: Option<&str>,
        exceptions: &[&str],
    ) -> Result<Box<dyn MethodConsumer>> {
        self.text.push_str(format!(
            "{{\nlet mut mv = cw.visit_method({}, {:?}, {:?}, {}, {})?;\n",
            flags_expr(access, FlagContext::Method),
            name,
            descriptor,
            opt_str(signature_),
            str_slice(exceptions)
        ));
        let child = self.text.push_child();
        self.text.push_str("}\n");
        Ok(Box::new(MethodEmitter {
            text: child,
            labels: HashMap::new(),
            generator_declared: false,
        }))
    }

    fn visit_end(&mut self) -> Result<()> {
        self.text.push_str("cw.visit_end()?;\n");
        Ok(())
    }
}

/// Emits the body of one field scope against a consumer named `fv`.
pub struct FieldEmitter {
    text: Text,
}

impl FieldConsumer for FieldEmitter {
    fn visit_annotation(
        &mut self,
        descriptor: &str,
        visible: bool,
    ) -> Result<Box<dyn AnnotationConsumer>> {
        Ok(Box::new(annotation_block(
            &self.text,
            "fv",
            &format!("visit_annotation({:?}, {})", descriptor, visible),
            0,
        )))
    }

    fn visit_end(&mut self) -> Result<()> {
        self.text.push_str("fv.visit_end()?;\n");
        Ok(())
    }
}

/// Emits the body of one method scope against a consumer named `mv`.
pub struct MethodEmitter {
    text: Text,
    labels: HashMap<Label, usize>,
    generator_declared: bool,
}

impl MethodEmitter {
    /// Name of `label`, declaring it (and the generator, once) into `decls`
    /// on first reference.
    fn label(&mut self, label: Label, decls: &mut String) -> String {
        let next = self.labels.len();
        match self.labels.get(&label) {
            Some(id) => format!("l{}", id),
            None => {
                if !self.generator_declared {
                    decls.push_str("let mut labels = LabelGenerator::new();\n");
                    self.generator_declared = true;
                }
                self.labels.insert(label, next);
                decls.push_str(&format!("let l{} = labels.fresh_label();\n", next));
                format!("l{}", next)
            }
        }
    }

    fn label_slice(&mut self, labels: &[Label], decls: &mut String) -> String {
        let names: Vec<String> = labels
            .iter()
            .map(|label| self.label(*label, decls))
            .collect();
        format!("&[{}]", names.join(", "))
    }

    fn verification_type(&mut self, vtype: &VerificationType, decls: &mut String) -> String {
        match vtype {
            VerificationType::Top => String::from("VerificationType::Top"),
            VerificationType::Integer => String::from("VerificationType::Integer"),
            VerificationType::Float => String::from("VerificationType::Float"),
            VerificationType::Double => String::from("VerificationType::Double"),
            VerificationType::Long => String::from("VerificationType::Long"),
            VerificationType::Null => String::from("VerificationType::Null"),
            VerificationType::UninitializedThis => {
                String::from("VerificationType::UninitializedThis")
            }
            VerificationType::Object(name) => {
                format!("VerificationType::Object(String::from({:?}))", name)
            }
            VerificationType::Uninitialized(label) => {
                format!(
                    "VerificationType::Uninitialized({})",
                    self.label(*label, decls)
                )
            }
        }
    }

    fn verification_types(&mut self, types: &[VerificationType], decls: &mut String) -> String {
        let parts: Vec<String> = types
            .iter()
            .map(|vtype| self.verification_type(vtype, decls))
            .collect();
        format!("vec![{}]", parts.join(", "))
    }

    /// Opcodes are emitted by their table name when they have one.
    fn opcode_expr(opcode: u8) -> String {
        match opcodes::mnemonic(opcode) {
            Some(name) => format!("opcodes::{}", name),
            None => opcode.to_string(),
        }
    }
}

impl MethodConsumer for MethodEmitter {
    fn visit_annotation(
        &mut self,
        descriptor: &str,
        visible: bool,
    ) -> Result<Box<dyn AnnotationConsumer>> {
        Ok(Box::new(annotation_block(
            &self.text,
            "mv",
            &format!("visit_annotation({:?}, {})", descriptor, visible),
            0,
        )))
    }

    fn visit_annotation_default(&mut self) -> Result<Box<dyn AnnotationConsumer>> {
        Ok(Box::new(annotation_block(
            &self.text,
            "mv",
            "visit_annotation_default()",
            0,
        )))
    }

    fn visit_parameter_annotation(
        &mut self,
        parameter: u32,
        descriptor: &str,
        visible: bool,
    ) -> Result<Box<dyn AnnotationConsumer>> {
        Ok(Box::new(annotation_block(
            &self.text,
            "mv",
            &format!(
                "visit_parameter_annotation({}, {:?}, {})",
                parameter, descriptor, visible
            ),
            0,
        )))
    }

    fn visit_code(&mut self) -> Result<()> {
        self.text.push_str("mv.visit_code()?;\n");
        Ok(())
    }

    fn visit_frame(&mut self, frame: &StackFrame) -> Result<()> {
        let mut decls = String::new();
        let expr = match frame {
            StackFrame::Same => String::from("StackFrame::Same"),
            StackFrame::Same1(vtype) => {
                format!("StackFrame::Same1({})", self.verification_type(vtype, &mut decls))
            }
            StackFrame::Append(locals) => format!(
                "StackFrame::Append({})",
                self.verification_types(locals, &mut decls)
            ),
            StackFrame::Chop(count) => format!("StackFrame::Chop({})", count),
            StackFrame::Full { locals, stack } => format!(
                "StackFrame::Full {{ locals: {}, stack: {} }}",
                self.verification_types(locals, &mut decls),
                self.verification_types(stack, &mut decls)
            ),
            StackFrame::New { locals, stack } => format!(
                "StackFrame::New {{ locals: {}, stack: {} }}",
                self.verification_types(locals, &mut decls),
                self.verification_types(stack, &mut decls)
            ),
        };
        self.text
            .push_str(format!("{}mv.visit_frame(&{})?;\n", decls, expr));
        Ok(())
    }

    fn visit_insn(&mut self, opcode: u8) -> Result<()> {
        self.text
            .push_str(format!("mv.visit_insn({})?;\n", Self::opcode_expr(opcode)));
        Ok(())
    }

    fn visit_int_insn(&mut self, opcode: u8, operand: i32) -> Result<()> {
        let operand_expr = if opcode == opcodes::NEWARRAY {
            match opcodes::array_type(operand) {
                Some(name) => format!("opcodes::{}", name),
                None => operand.to_string(),
            }
        } else {
            operand.to_string()
        };
        self.text.push_str(format!(
            "mv.visit_int_insn({}, {})?;\n",
            Self::opcode_expr(opcode),
            operand_expr
        ));
        Ok(())
    }

    fn visit_var_insn(&mut self, opcode: u8, var: i32) -> Result<()> {
        self.text.push_str(format!(
            "mv.visit_var_insn({}, {})?;\n",
            Self::opcode_expr(opcode),
            var
        ));
        Ok(())
    }

    fn visit_type_insn(&mut self, opcode: u8, type_name: &str) -> Result<()> {
        self.text.push_str(format!(
            "mv.visit_type_insn({}, {:?})?;\n",
            Self::opcode_expr(opcode),
            type_name
        ));
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
            "mv.visit_field_insn({}, {:?}, {:?}, {:?})?;\n",
            Self::opcode_expr(opcode),
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
            "mv.visit_method_insn({}, {:?}, {:?}, {:?})?;\n",
            Self::opcode_expr(opcode),
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
        let argument_exprs: Vec<String> = arguments
            .iter()
            .map(|argument| match argument {
                BootstrapArgument::Constant(constant) => {
                    format!("BootstrapArgument::Constant({})", constant_expr(constant))
                }
                BootstrapArgument::Handle(handle) => {
                    format!("BootstrapArgument::Handle({})", handle_expr(handle))
                }
            })
            .collect();
        self.text.push_str(format!(
            "mv.visit_invoke_dynamic({:?}, {:?}, &{}, &[{}])?;\n",
            name,
            descriptor,
            handle_expr(bootstrap),
            argument_exprs.join(", ")
        ));
        Ok(())
    }

    fn visit_jump_insn(&mut self, opcode: u8, label: Label) -> Result<()> {
        let mut decls = String::new();
        let label_name = self.label(label, &mut decls);
        self.text.push_str(format!(
            "{}mv.visit_jump_insn({}, {})?;\n",
            decls,
            Self::opcode_expr(opcode),
            label_name
        ));
        Ok(())
    }

    fn visit_label(&mut self, label: Label) -> Result<()> {
        let mut decls = String::new();
        let label_name = self.label(label, &mut decls);
        self.text
            .push_str(format!("{}mv.visit_label({})?;\n", decls, label_name));
        Ok(())
    }

    fn visit_ldc_insn(&mut self, constant: &Constant) -> Result<()> {
        self.text.push_str(format!(
            "mv.visit_ldc_insn(&{})?;\n",
            constant_expr(constant)
        ));
        Ok(())
    }

    fn visit_iinc_insn(&mut self, var: i32, increment: i32) -> Result<()> {
        self.text
            .push_str(format!("mv.visit_iinc_insn({}, {})?;\n", var, increment));
        Ok(())
    }

    fn visit_table_switch(
        &mut self,
        min: i32,
        max: i32,
        default: Label,
        labels: &[Label],
    ) -> Result<()> {
        let mut decls = String::new();
        let default_name = self.label(default, &mut decls);
        let labels_expr = self.label_slice(labels, &mut decls);
        self.text.push_str(format!(
            "{}mv.visit_table_switch({}, {}, {}, {})?;\n",
            decls, min, max, default_name, labels_expr
        ));
        Ok(())
    }

    fn visit_lookup_switch(
        &mut self,
        default: Label,
        keys: &[i32],
        labels: &[Label],
    ) -> Result<()> {
        let mut decls = String::new();
        let default_name = self.label(default, &mut decls);
        let labels_expr = self.label_slice(labels, &mut decls);
        let keys_expr: Vec<String> = keys.iter().map(|key| key.to_string()).collect();
        self.text.push_str(format!(
            "{}mv.visit_lookup_switch({}, &[{}], {})?;\n",
            decls,
            default_name,
            keys_expr.join(", "),
            labels_expr
        ));
        Ok(())
    }

    fn visit_multi_new_array(&mut self, descriptor: &str, dimensions: i32) -> Result<()> {
        self.text.push_str(format!(
            "mv.visit_multi_new_array({:?}, {})?;\n",
            descriptor, dimensions
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
        let mut decls = String::new();
        let start_name = self.label(start, &mut decls);
        let end_name = self.label(end, &mut decls);
        let handler_name = self.label(handler, &mut decls);
        self.text.push_str(format!(
            "{}mv.visit_try_catch({}, {}, {}, {})?;\n",
            decls,
            start_name,
            end_name,
            handler_name,
            opt_str(catch_type)
        ));
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
        let mut decls = String::new();
        let start_name = self.label(start, &mut decls);
        let end_name = self.label(end, &mut decls);
        self.text.push_str(format!(
            "{}mv.visit_local_variable({:?}, {:?}, {}, {}, {}, {})?;\n",
            decls,
            name,
            descriptor,
            opt_str(signature_),
            start_name,
            end_name,
            index
        ));
        Ok(())
    }

    fn visit_line_number(&mut self, line: i32, start: Label) -> Result<()> {
        let mut decls = String::new();
        let start_name = self.label(start, &mut decls);
        self.text.push_str(format!(
            "{}mv.visit_line_number({}, {})?;\n",
            decls, line, start_name
        ));
        Ok(())
    }

    fn visit_maxs(&mut self, max_stack: i32, max_locals: i32) -> Result<()> {
        self.text.push_str(format!(
            "mv.visit_maxs({}, {})?;\n",
            max_stack, max_locals
        ));
        Ok(())
    }

    fn visit_end(&mut self) -> Result<()> {
        self.text.push_str("mv.visit_end()?;\n");
        Ok(())
    }
}

/// Emits the values of one annotation scope against a consumer named by
/// nesting depth (`av0`, `av1`, ...).
pub struct AnnotationEmitter {
    text: Text,
    depth: usize,
}

/// Opens a brace block on `parent` binding `av<depth>` to `owner.<call>` and
/// returns the emitter for the statements spliced inside it.
fn annotation_block(parent: &Text, owner: &str, call: &str, depth: usize) -> AnnotationEmitter {
    parent.push_str(format!(
        "{{\nlet mut av{} = {}.{}?;\n",
        depth, owner, call
    ));
    let child = parent.push_child();
    parent.push_str("}\n");
    AnnotationEmitter { text: child, depth }
}

impl AnnotationEmitter {
    fn var(&self) -> String {
        format!("av{}", self.depth)
    }
}

impl AnnotationConsumer for AnnotationEmitter {
    fn visit_value(&mut self, name: Option<&str>, value: &AnnotationValue) -> Result<()> {
        self.text.push_str(format!(
            "{}.visit_value({}, &{})?;\n",
            self.var(),
            opt_str(name),
            value_expr(value)
        ));
        Ok(())
    }

    fn visit_enum(&mut self, name: Option<&str>, descriptor: &str, value: &str) -> Result<()> {
        self.text.push_str(format!(
            "{}.visit_enum({}, {:?}, {:?})?;\n",
            self.var(),
            opt_str(name),
            descriptor,
            value
        ));
        Ok(())
    }

    fn visit_nested(
        &mut self,
        name: Option<&str>,
        descriptor: &str,
    ) -> Result<Box<dyn AnnotationConsumer>> {
        Ok(Box::new(annotation_block(
            &self.text,
            &self.var(),
            &format!("visit_nested({}, {:?})", opt_str(name), descriptor),
            self.depth + 1,
        )))
    }

    fn visit_array(&mut self, name: Option<&str>) -> Result<Box<dyn AnnotationConsumer>> {
        Ok(Box::new(annotation_block(
            &self.text,
            &self.var(),
            &format!("visit_array({})", opt_str(name)),
            self.depth + 1,
        )))
    }

    fn visit_end(&mut self) -> Result<()> {
        self.text
            .push_str(format!("{}.visit_end()?;\n", self.var()));
        Ok(())
    }
}
