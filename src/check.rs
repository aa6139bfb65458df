//! Checking consumers
//!
//! Each checker wraps a downstream consumer and verifies, per event, that the
//! call is legal at this point in the scope's lifecycle and that its
//! arguments are well formed. A bad event errors out before anything reaches
//! the wrapped consumer, so the downstream only ever sees a prefix of a
//! valid stream.
//!
//! The checks are structural only. Nothing here verifies dataflow, stack
//! depth, or that jump targets are ever defined.

use crate::errors::{Error, Result};
use crate::event::{
    AccessFlags, AnnotationConsumer, AnnotationValue, BootstrapArgument, ClassConsumer, Constant,
    FieldConsumer, Handle, Label, MethodConsumer, StackFrame, VerificationType,
};
use crate::opcodes::{self, OperandShape};
use crate::signature;
use std::collections::HashMap;

fn check_access(access: AccessFlags, allowed: AccessFlags) -> Result<()> {
    if !allowed.contains(access) {
        return Err(Error::InvalidArgument(format!(
            "Invalid access flags: 0x{:x}",
            access.bits()
        )));
    }
    let visibility = access
        & (AccessFlags::PUBLIC | AccessFlags::PRIVATE | AccessFlags::PROTECTED);
    if visibility.bits().count_ones() > 1 {
        return Err(Error::InvalidArgument(format!(
            "public, private and protected are mutually exclusive: 0x{:x}",
            access.bits()
        )));
    }
    if access.contains(AccessFlags::FINAL | AccessFlags::ABSTRACT) {
        return Err(Error::InvalidArgument(format!(
            "final and abstract are mutually exclusive: 0x{:x}",
            access.bits()
        )));
    }
    Ok(())
}

fn check_signed_byte(value: i32, what: &str) -> Result<()> {
    if value < -128 || value > 127 {
        return Err(Error::InvalidArgument(format!(
            "Invalid {} (must be a signed byte): {}",
            what, value
        )));
    }
    Ok(())
}

fn check_signed_short(value: i32, what: &str) -> Result<()> {
    if value < -32768 || value > 32767 {
        return Err(Error::InvalidArgument(format!(
            "Invalid {} (must be a signed short): {}",
            what, value
        )));
    }
    Ok(())
}

fn check_unsigned_short(value: i32, what: &str) -> Result<()> {
    if value < 0 || value > 65535 {
        return Err(Error::InvalidArgument(format!(
            "Invalid {} (must be an unsigned short): {}",
            what, value
        )));
    }
    Ok(())
}

fn check_handle(handle: &Handle, what: &str) -> Result<()> {
    signature::check_internal_name(&handle.owner, what)?;
    signature::check_method_identifier(&handle.name, what)?;
    match handle.kind.tag() {
        1..=4 => signature::check_descriptor(&handle.descriptor, false),
        _ => signature::check_method_descriptor(&handle.descriptor),
    }
}

fn check_constant(constant: &Constant) -> Result<()> {
    if let Constant::Class(descriptor) = constant {
        signature::check_descriptor(descriptor, false)?;
    }
    Ok(())
}

fn check_verification_types(types: &[VerificationType]) -> Result<()> {
    for vtype in types {
        if let VerificationType::Object(name) = vtype {
            signature::check_internal_name(name, "frame type")?;
        }
    }
    Ok(())
}

/// Checks the class-scope lifecycle and every member declaration.
pub struct ClassChecker {
    inner: Box<dyn ClassConsumer>,
    started: bool,
    source_visited: bool,
    outer_visited: bool,
    ended: bool,
}

impl ClassChecker {
    const CLASS_ACCESS: AccessFlags = AccessFlags::from_bits_truncate(
        AccessFlags::PUBLIC.bits()
            | AccessFlags::FINAL.bits()
            | AccessFlags::SUPER.bits()
            | AccessFlags::INTERFACE.bits()
            | AccessFlags::ABSTRACT.bits()
            | AccessFlags::SYNTHETIC.bits()
            | AccessFlags::ANNOTATION.bits()
            | AccessFlags::ENUM.bits()
            | AccessFlags::DEPRECATED.bits(),
    );

    const INNER_ACCESS: AccessFlags = AccessFlags::from_bits_truncate(
        AccessFlags::PUBLIC.bits()
            | AccessFlags::PRIVATE.bits()
            | AccessFlags::PROTECTED.bits()
            | AccessFlags::STATIC.bits()
            | AccessFlags::FINAL.bits()
            | AccessFlags::INTERFACE.bits()
            | AccessFlags::ABSTRACT.bits()
            | AccessFlags::SYNTHETIC.bits()
            | AccessFlags::ANNOTATION.bits()
            | AccessFlags::ENUM.bits(),
    );

    const FIELD_ACCESS: AccessFlags = AccessFlags::from_bits_truncate(
        AccessFlags::PUBLIC.bits()
            | AccessFlags::PRIVATE.bits()
            | AccessFlags::PROTECTED.bits()
            | AccessFlags::STATIC.bits()
            | AccessFlags::FINAL.bits()
            | AccessFlags::VOLATILE.bits()
            | AccessFlags::TRANSIENT.bits()
            | AccessFlags::SYNTHETIC.bits()
            | AccessFlags::ENUM.bits()
            | AccessFlags::DEPRECATED.bits(),
    );

    const METHOD_ACCESS: AccessFlags = AccessFlags::from_bits_truncate(
        AccessFlags::PUBLIC.bits()
            | AccessFlags::PRIVATE.bits()
            | AccessFlags::PROTECTED.bits()
            | AccessFlags::STATIC.bits()
            | AccessFlags::FINAL.bits()
            | AccessFlags::SYNCHRONIZED.bits()
            | AccessFlags::BRIDGE.bits()
            | AccessFlags::VARARGS.bits()
            | AccessFlags::NATIVE.bits()
            | AccessFlags::ABSTRACT.bits()
            | AccessFlags::STRICT.bits()
            | AccessFlags::SYNTHETIC.bits()
            | AccessFlags::DEPRECATED.bits(),
    );

    pub fn new(inner: Box<dyn ClassConsumer>) -> ClassChecker {
        ClassChecker {
            inner,
            started: false,
            source_visited: false,
            outer_visited: false,
            ended: false,
        }
    }

    fn check_open(&self) -> Result<()> {
        if !self.started {
            return Err(Error::Sequencing(
                "Cannot visit member before visit_header has been called",
            ));
        }
        if self.ended {
            return Err(Error::Sequencing(
                "Cannot visit member after visit_end has been called",
            ));
        }
        Ok(())
    }
}

impl ClassConsumer for ClassChecker {
    fn visit_header(
        &mut self,
        version: u32,
        access: AccessFlags,
        name: &str,
        signature_: Option<&str>,
        super_name: Option<&str>,
        interfaces: &[&str],
    ) -> Result<()> {
        if self.started {
            return Err(Error::Sequencing("visit_header must be called only once"));
        }
        if self.ended {
            return Err(Error::Sequencing(
                "Cannot visit member after visit_end has been called",
            ));
        }
        check_access(access, Self::CLASS_ACCESS)?;
        // package-info pseudo-classes carry a name no identifier rule accepts
        if !name.ends_with("package-info") {
            signature::check_internal_name(name, "class name")?;
        }
        if name == "java/lang/Object" {
            if super_name.is_some() {
                return Err(Error::InvalidArgument(String::from(
                    "The super class name of the Object class must be null",
                )));
            }
        } else {
            match super_name {
                None => {
                    return Err(Error::InvalidArgument(String::from(
                        "Invalid super class name (must not be null)",
                    )))
                }
                Some(super_name) => {
                    signature::check_internal_name(super_name, "super class name")?;
                    if access.contains(AccessFlags::INTERFACE)
                        && super_name != "java/lang/Object"
                    {
                        return Err(Error::InvalidArgument(String::from(
                            "The super class name of interfaces must be java/lang/Object",
                        )));
                    }
                }
            }
        }
        if let Some(sig) = signature_ {
            signature::check_class_signature(sig)?;
        }
        for interface in interfaces {
            signature::check_internal_name(interface, "interface name")?;
        }
        self.started = true;
        self.inner
            .visit_header(version, access, name, signature_, super_name, interfaces)
    }

    fn visit_source(&mut self, file: Option<&str>, debug: Option<&str>) -> Result<()> {
        self.check_open()?;
        if self.source_visited {
            return Err(Error::Sequencing("visit_source must be called only once"));
        }
        self.source_visited = true;
        self.inner.visit_source(file, debug)
    }

    fn visit_outer_class(
        &mut self,
        owner: &str,
        name: Option<&str>,
        descriptor: Option<&str>,
    ) -> Result<()> {
        self.check_open()?;
        if self.outer_visited {
            return Err(Error::Sequencing(
                "visit_outer_class must be called only once",
            ));
        }
        signature::check_internal_name(owner, "owner")?;
        if let Some(descriptor) = descriptor {
            signature::check_method_descriptor(descriptor)?;
        }
        self.outer_visited = true;
        self.inner.visit_outer_class(owner, name, descriptor)
    }

    fn visit_inner_class(
        &mut self,
        name: &str,
        outer_name: Option<&str>,
        inner_name: Option<&str>,
        access: AccessFlags,
    ) -> Result<()> {
        self.check_open()?;
        signature::check_internal_name(name, "inner class name")?;
        if let Some(outer_name) = outer_name {
            signature::check_internal_name(outer_name, "outer class name")?;
        }
        if let Some(inner_name) = inner_name {
            signature::check_identifier(inner_name, "inner class simple name")?;
        }
        check_access(access, Self::INNER_ACCESS)?;
        self.inner
            .visit_inner_class(name, outer_name, inner_name, access)
    }

    fn visit_annotation(
        &mut self,
        descriptor: &str,
        visible: bool,
    ) -> Result<Box<dyn AnnotationConsumer>> {
        self.check_open()?;
        signature::check_descriptor(descriptor, false)?;
        let inner = self.inner.visit_annotation(descriptor, visible)?;
        Ok(Box::new(AnnotationChecker::new(inner, true)))
    }

    fn visit_field(
        &mut self,
        access: AccessFlags,
        name: &str,
        descriptor: &str,
        signature_: Option<&str>,
        value: Option<&Constant>,
    ) -> Result<Box<dyn FieldConsumer>> {
        self.check_open()?;
        check_access(access, Self::FIELD_ACCESS)?;
        signature::check_identifier(name, "field name")?;
        signature::check_descriptor(descriptor, false)?;
        if let Some(sig) = signature_ {
            signature::check_field_signature(sig)?;
        }
        match value {
            Some(Constant::Class(_)) => {
                return Err(Error::InvalidArgument(String::from(
                    "Invalid field value (must not be a class constant)",
                )))
            }
            _ => {}
        }
        let inner = self
            .inner
            .visit_field(access, name, descriptor, signature_, value)?;
        Ok(Box::new(FieldChecker::new(inner)))
    }

    fn visit_method(
        &mut self,
        access: AccessFlags,
        name: &str,
        descriptor: &str,
        signature_: Option<&str>,
        exceptions: &[&str],
    ) -> Result<Box<dyn MethodConsumer>> {
        self.check_open()?;
        check_access(access, Self::METHOD_ACCESS)?;
        signature::check_method_identifier(name, "method name")?;
        signature::check_method_descriptor(descriptor)?;
        if let Some(sig) = signature_ {
            signature::check_method_signature(sig)?;
        }
        for exception in exceptions {
            signature::check_internal_name(exception, "exception name")?;
        }
        let inner = self
            .inner
            .visit_method(access, name, descriptor, signature_, exceptions)?;
        Ok(Box::new(MethodChecker::new(inner)))
    }

    fn visit_end(&mut self) -> Result<()> {
        self.check_open()?;
        self.ended = true;
        self.inner.visit_end()
    }
}

/// Checks the method-scope lifecycle, instruction operand shapes, and
/// operand bounds.
pub struct MethodChecker {
    inner: Box<dyn MethodConsumer>,
    code_started: bool,
    code_ended: bool,
    ended: bool,
    /// Visited labels in visit order
    labels: HashMap<Label, usize>,
}

impl MethodChecker {
    pub fn new(inner: Box<dyn MethodConsumer>) -> MethodChecker {
        MethodChecker {
            inner,
            code_started: false,
            code_ended: false,
            ended: false,
            labels: HashMap::new(),
        }
    }

    fn check_not_ended(&self) -> Result<()> {
        if self.ended {
            return Err(Error::Sequencing(
                "Cannot visit elements after visit_end has been called",
            ));
        }
        Ok(())
    }

    fn check_in_code(&self) -> Result<()> {
        self.check_not_ended()?;
        if !self.code_started {
            return Err(Error::Sequencing(
                "Cannot visit instructions before visit_code has been called",
            ));
        }
        if self.code_ended {
            return Err(Error::Sequencing(
                "Cannot visit instructions after visit_maxs has been called",
            ));
        }
        Ok(())
    }

    fn check_opcode(&self, opcode: u8, expected: OperandShape) -> Result<()> {
        if opcodes::shape(opcode) != Some(expected) {
            return Err(Error::InvalidArgument(format!(
                "Invalid opcode: {}",
                opcode
            )));
        }
        Ok(())
    }

    fn resolved_label(&self, label: Label, what: &str) -> Result<usize> {
        self.labels.get(&label).copied().ok_or_else(|| {
            Error::InvalidArgument(format!(
                "Invalid {} (must be visited first): {:?}",
                what, label
            ))
        })
    }
}

impl MethodConsumer for MethodChecker {
    fn visit_annotation(
        &mut self,
        descriptor: &str,
        visible: bool,
    ) -> Result<Box<dyn AnnotationConsumer>> {
        self.check_not_ended()?;
        signature::check_descriptor(descriptor, false)?;
        let inner = self.inner.visit_annotation(descriptor, visible)?;
        Ok(Box::new(AnnotationChecker::new(inner, true)))
    }

    fn visit_annotation_default(&mut self) -> Result<Box<dyn AnnotationConsumer>> {
        self.check_not_ended()?;
        let inner = self.inner.visit_annotation_default()?;
        Ok(Box::new(AnnotationChecker::new(inner, false)))
    }

    fn visit_parameter_annotation(
        &mut self,
        parameter: u32,
        descriptor: &str,
        visible: bool,
    ) -> Result<Box<dyn AnnotationConsumer>> {
        self.check_not_ended()?;
        signature::check_descriptor(descriptor, false)?;
        let inner = self
            .inner
            .visit_parameter_annotation(parameter, descriptor, visible)?;
        Ok(Box::new(AnnotationChecker::new(inner, true)))
    }

    fn visit_code(&mut self) -> Result<()> {
        self.check_not_ended()?;
        if self.code_started {
            return Err(Error::Sequencing("visit_code must be called only once"));
        }
        self.code_started = true;
        self.inner.visit_code()
    }

    fn visit_frame(&mut self, frame: &StackFrame) -> Result<()> {
        self.check_in_code()?;
        match frame {
            StackFrame::Same => {}
            StackFrame::Same1(vtype) => check_verification_types(std::slice::from_ref(vtype))?,
            StackFrame::Append(locals) => {
                if locals.is_empty() || locals.len() > 3 {
                    return Err(Error::InvalidArgument(format!(
                        "Invalid append frame (must add 1 to 3 locals): {}",
                        locals.len()
                    )));
                }
                check_verification_types(locals)?;
            }
            StackFrame::Chop(count) => {
                if *count < 1 || *count > 3 {
                    return Err(Error::InvalidArgument(format!(
                        "Invalid chop frame (must remove 1 to 3 locals): {}",
                        count
                    )));
                }
            }
            StackFrame::Full { locals, stack } | StackFrame::New { locals, stack } => {
                check_verification_types(locals)?;
                check_verification_types(stack)?;
            }
        }
        self.inner.visit_frame(frame)
    }

    fn visit_insn(&mut self, opcode: u8) -> Result<()> {
        self.check_in_code()?;
        self.check_opcode(opcode, OperandShape::Plain)?;
        self.inner.visit_insn(opcode)
    }

    fn visit_int_insn(&mut self, opcode: u8, operand: i32) -> Result<()> {
        self.check_in_code()?;
        self.check_opcode(opcode, OperandShape::IntOperand)?;
        match opcode {
            opcodes::BIPUSH => check_signed_byte(operand, "operand")?,
            opcodes::SIPUSH => check_signed_short(operand, "operand")?,
            opcodes::NEWARRAY => {
                if opcodes::array_type(operand).is_none() {
                    return Err(Error::InvalidArgument(format!(
                        "Invalid operand (must be an array type code T_BOOLEAN..T_LONG): {}",
                        operand
                    )));
                }
            }
            _ => {}
        }
        self.inner.visit_int_insn(opcode, operand)
    }

    fn visit_var_insn(&mut self, opcode: u8, var: i32) -> Result<()> {
        self.check_in_code()?;
        self.check_opcode(opcode, OperandShape::Var)?;
        check_unsigned_short(var, "variable index")?;
        self.inner.visit_var_insn(opcode, var)
    }

    fn visit_type_insn(&mut self, opcode: u8, type_name: &str) -> Result<()> {
        self.check_in_code()?;
        self.check_opcode(opcode, OperandShape::Type)?;
        signature::check_internal_name(type_name, "type")?;
        if opcode == opcodes::NEW && type_name.starts_with('[') {
            return Err(Error::InvalidArgument(format!(
                "NEW cannot be used to create arrays: {}",
                type_name
            )));
        }
        self.inner.visit_type_insn(opcode, type_name)
    }

    fn visit_field_insn(
        &mut self,
        opcode: u8,
        owner: &str,
        name: &str,
        descriptor: &str,
    ) -> Result<()> {
        self.check_in_code()?;
        self.check_opcode(opcode, OperandShape::Field)?;
        signature::check_internal_name(owner, "owner")?;
        signature::check_identifier(name, "name")?;
        signature::check_descriptor(descriptor, false)?;
        self.inner.visit_field_insn(opcode, owner, name, descriptor)
    }

    fn visit_method_insn(
        &mut self,
        opcode: u8,
        owner: &str,
        name: &str,
        descriptor: &str,
    ) -> Result<()> {
        self.check_in_code()?;
        self.check_opcode(opcode, OperandShape::Method)?;
        signature::check_internal_name(owner, "owner")?;
        signature::check_method_identifier(name, "name")?;
        signature::check_method_descriptor(descriptor)?;
        self.inner
            .visit_method_insn(opcode, owner, name, descriptor)
    }

    fn visit_invoke_dynamic(
        &mut self,
        name: &str,
        descriptor: &str,
        bootstrap: &Handle,
        arguments: &[BootstrapArgument],
    ) -> Result<()> {
        self.check_in_code()?;
        signature::check_method_identifier(name, "name")?;
        signature::check_method_descriptor(descriptor)?;
        check_handle(bootstrap, "bootstrap method handle")?;
        for argument in arguments {
            match argument {
                BootstrapArgument::Constant(constant) => check_constant(constant)?,
                BootstrapArgument::Handle(handle) => {
                    check_handle(handle, "bootstrap method argument")?
                }
            }
        }
        self.inner
            .visit_invoke_dynamic(name, descriptor, bootstrap, arguments)
    }

    fn visit_jump_insn(&mut self, opcode: u8, label: Label) -> Result<()> {
        self.check_in_code()?;
        self.check_opcode(opcode, OperandShape::Jump)?;
        self.inner.visit_jump_insn(opcode, label)
    }

    fn visit_label(&mut self, label: Label) -> Result<()> {
        self.check_in_code()?;
        let position = self.labels.len();
        if self.labels.insert(label, position).is_some() {
            return Err(Error::Sequencing("Already visited label"));
        }
        self.inner.visit_label(label)
    }

    fn visit_ldc_insn(&mut self, constant: &Constant) -> Result<()> {
        self.check_in_code()?;
        check_constant(constant)?;
        self.inner.visit_ldc_insn(constant)
    }

    fn visit_iinc_insn(&mut self, var: i32, increment: i32) -> Result<()> {
        self.check_in_code()?;
        check_unsigned_short(var, "variable index")?;
        check_signed_short(increment, "increment")?;
        self.inner.visit_iinc_insn(var, increment)
    }

    fn visit_table_switch(
        &mut self,
        min: i32,
        max: i32,
        default: Label,
        labels: &[Label],
    ) -> Result<()> {
        self.check_in_code()?;
        if max < min {
            return Err(Error::InvalidArgument(format!(
                "Max = {} must be greater than or equal to min = {}",
                max, min
            )));
        }
        let expected = (max as i64 - min as i64 + 1) as usize;
        if labels.len() != expected {
            return Err(Error::InvalidArgument(format!(
                "There must be max - min + 1 labels: expected {}, got {}",
                expected,
                labels.len()
            )));
        }
        self.inner.visit_table_switch(min, max, default, labels)
    }

    fn visit_lookup_switch(
        &mut self,
        default: Label,
        keys: &[i32],
        labels: &[Label],
    ) -> Result<()> {
        self.check_in_code()?;
        if keys.len() != labels.len() {
            return Err(Error::InvalidArgument(format!(
                "There must be the same number of keys and labels: {} keys, {} labels",
                keys.len(),
                labels.len()
            )));
        }
        self.inner.visit_lookup_switch(default, keys, labels)
    }

    fn visit_multi_new_array(&mut self, descriptor: &str, dimensions: i32) -> Result<()> {
        self.check_in_code()?;
        signature::check_descriptor(descriptor, false)?;
        if !descriptor.starts_with('[') {
            return Err(Error::InvalidArgument(format!(
                "Invalid descriptor (must be an array type descriptor): {}",
                descriptor
            )));
        }
        let max_dimensions = descriptor.bytes().take_while(|b| *b == b'[').count() as i32;
        if dimensions < 1 || dimensions > max_dimensions {
            return Err(Error::InvalidArgument(format!(
                "Invalid dimensions (must be between 1 and {}): {}",
                max_dimensions, dimensions
            )));
        }
        self.inner.visit_multi_new_array(descriptor, dimensions)
    }

    fn visit_try_catch(
        &mut self,
        start: Label,
        end: Label,
        handler: Label,
        catch_type: Option<&str>,
    ) -> Result<()> {
        self.check_in_code()?;
        if let Some(catch_type) = catch_type {
            signature::check_internal_name(catch_type, "catch type")?;
        }
        self.inner.visit_try_catch(start, end, handler, catch_type)
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
        self.check_in_code()?;
        signature::check_identifier(name, "name")?;
        signature::check_descriptor(descriptor, false)?;
        if let Some(sig) = signature_ {
            signature::check_field_signature(sig)?;
        }
        check_unsigned_short(index, "variable index")?;
        let start_position = self.resolved_label(start, "start label")?;
        let end_position = self.resolved_label(end, "end label")?;
        if end_position < start_position {
            return Err(Error::InvalidArgument(String::from(
                "Invalid start and end labels (end must be greater than start)",
            )));
        }
        self.inner
            .visit_local_variable(name, descriptor, signature_, start, end, index)
    }

    fn visit_line_number(&mut self, line: i32, start: Label) -> Result<()> {
        self.check_in_code()?;
        check_unsigned_short(line, "line number")?;
        self.resolved_label(start, "start label")?;
        self.inner.visit_line_number(line, start)
    }

    fn visit_maxs(&mut self, max_stack: i32, max_locals: i32) -> Result<()> {
        self.check_in_code()?;
        check_unsigned_short(max_stack, "max stack")?;
        check_unsigned_short(max_locals, "max locals")?;
        self.code_ended = true;
        self.inner.visit_maxs(max_stack, max_locals)
    }

    fn visit_end(&mut self) -> Result<()> {
        self.check_not_ended()?;
        if self.code_started && !self.code_ended {
            return Err(Error::Sequencing(
                "visit_maxs must be called before visit_end",
            ));
        }
        self.ended = true;
        self.inner.visit_end()
    }
}

/// Checks the field-scope lifecycle.
pub struct FieldChecker {
    inner: Box<dyn FieldConsumer>,
    ended: bool,
}

impl FieldChecker {
    pub fn new(inner: Box<dyn FieldConsumer>) -> FieldChecker {
        FieldChecker {
            inner,
            ended: false,
        }
    }

    fn check_not_ended(&self) -> Result<()> {
        if self.ended {
            return Err(Error::Sequencing(
                "Cannot visit elements after visit_end has been called",
            ));
        }
        Ok(())
    }
}

impl FieldConsumer for FieldChecker {
    fn visit_annotation(
        &mut self,
        descriptor: &str,
        visible: bool,
    ) -> Result<Box<dyn AnnotationConsumer>> {
        self.check_not_ended()?;
        signature::check_descriptor(descriptor, false)?;
        let inner = self.inner.visit_annotation(descriptor, visible)?;
        Ok(Box::new(AnnotationChecker::new(inner, true)))
    }

    fn visit_end(&mut self) -> Result<()> {
        self.check_not_ended()?;
        self.ended = true;
        self.inner.visit_end()
    }
}

/// Checks annotation values. Inside an annotation body every element must be
/// named; inside an array or an annotation default, none may be.
pub struct AnnotationChecker {
    inner: Box<dyn AnnotationConsumer>,
    named: bool,
    ended: bool,
}

impl AnnotationChecker {
    pub fn new(inner: Box<dyn AnnotationConsumer>, named: bool) -> AnnotationChecker {
        AnnotationChecker {
            inner,
            named,
            ended: false,
        }
    }

    fn check_name(&self, name: Option<&str>) -> Result<()> {
        if self.ended {
            return Err(Error::Sequencing(
                "Cannot visit elements after visit_end has been called",
            ));
        }
        if self.named && name.is_none() {
            return Err(Error::InvalidArgument(String::from(
                "Annotation value name must not be null",
            )));
        }
        if !self.named && name.is_some() {
            return Err(Error::InvalidArgument(String::from(
                "Annotation array values must not be named",
            )));
        }
        Ok(())
    }
}

impl AnnotationConsumer for AnnotationChecker {
    fn visit_value(&mut self, name: Option<&str>, value: &AnnotationValue) -> Result<()> {
        self.check_name(name)?;
        if let AnnotationValue::Class(descriptor) = value {
            signature::check_descriptor(descriptor, false)?;
        }
        self.inner.visit_value(name, value)
    }

    fn visit_enum(&mut self, name: Option<&str>, descriptor: &str, value: &str) -> Result<()> {
        self.check_name(name)?;
        signature::check_descriptor(descriptor, false)?;
        signature::check_identifier(value, "enum constant name")?;
        self.inner.visit_enum(name, descriptor, value)
    }

    fn visit_nested(
        &mut self,
        name: Option<&str>,
        descriptor: &str,
    ) -> Result<Box<dyn AnnotationConsumer>> {
        self.check_name(name)?;
        signature::check_descriptor(descriptor, false)?;
        let inner = self.inner.visit_nested(name, descriptor)?;
        Ok(Box::new(AnnotationChecker::new(inner, true)))
    }

    fn visit_array(&mut self, name: Option<&str>) -> Result<Box<dyn AnnotationConsumer>> {
        self.check_name(name)?;
        let inner = self.inner.visit_array(name)?;
        Ok(Box::new(AnnotationChecker::new(inner, false)))
    }

    fn visit_end(&mut self) -> Result<()> {
        if self.ended {
            return Err(Error::Sequencing("visit_end must be called only once"));
        }
        self.ended = true;
        self.inner.visit_end()
    }
}
