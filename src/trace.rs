//! Delegating tees
//!
//! A tracer pairs a printer with an optional downstream consumer. Every
//! event is rendered first, then forwarded unmodified, so the downstream
//! sees exactly the stream the tracer saw while a disassembly listing
//! accumulates on the side. With no downstream the tracer is just a
//! printer behind the consumer traits.

use crate::errors::Result;
use crate::event::{
    AccessFlags, AnnotationConsumer, AnnotationValue, BootstrapArgument, ClassConsumer, Constant,
    FieldConsumer, Handle, Label, MethodConsumer, StackFrame,
};
use crate::printer::{AnnotationPrinter, ClassPrinter, FieldPrinter, MethodPrinter};
use std::io;

/// Tees class events into a [`ClassPrinter`] and an optional downstream.
pub struct ClassTracer {
    printer: ClassPrinter,
    downstream: Option<Box<dyn ClassConsumer>>,
}

impl ClassTracer {
    pub fn new(downstream: Option<Box<dyn ClassConsumer>>) -> ClassTracer {
        ClassTracer {
            printer: ClassPrinter::new(),
            downstream,
        }
    }

    /// Handle on the printer's tree; shares state with this tracer.
    pub fn text(&self) -> crate::text::Text {
        self.printer.text()
    }

    /// Rendered listing; complete only after the class scope has ended.
    pub fn render(&self) -> String {
        self.printer.render()
    }

    /// Write the rendered listing to `sink`.
    pub fn flush_to(&self, sink: &mut dyn io::Write) -> Result<()> {
        sink.write_all(self.render().as_bytes())?;
        sink.flush()?;
        Ok(())
    }
}

impl ClassConsumer for ClassTracer {
    fn visit_header(
        &mut self,
        version: u32,
        access: AccessFlags,
        name: &str,
        signature: Option<&str>,
        super_name: Option<&str>,
        interfaces: &[&str],
    ) -> Result<()> {
        self.printer
            .visit_header(version, access, name, signature, super_name, interfaces)?;
        if let Some(downstream) = &mut self.downstream {
            downstream.visit_header(version, access, name, signature, super_name, interfaces)?;
        }
        Ok(())
    }

    fn visit_source(&mut self, file: Option<&str>, debug: Option<&str>) -> Result<()> {
        self.printer.visit_source(file, debug)?;
        if let Some(downstream) = &mut self.downstream {
            downstream.visit_source(file, debug)?;
        }
        Ok(())
    }

    fn visit_outer_class(
        &mut self,
        owner: &str,
        name: Option<&str>,
        descriptor: Option<&str>,
    ) -> Result<()> {
        self.printer.visit_outer_class(owner, name, descriptor)?;
        if let Some(downstream) = &mut self.downstream {
            downstream.visit_outer_class(owner, name, descriptor)?;
        }
        Ok(())
    }

    fn visit_inner_class(
        &mut self,
        name: &str,
        outer_name: Option<&str>,
        inner_name: Option<&str>,
        access: AccessFlags,
    ) -> Result<()> {
        self.printer
            .visit_inner_class(name, outer_name, inner_name, access)?;
        if let Some(downstream) = &mut self.downstream {
            downstream.visit_inner_class(name, outer_name, inner_name, access)?;
        }
        Ok(())
    }

    fn visit_annotation(
        &mut self,
        descriptor: &str,
        visible: bool,
    ) -> Result<Box<dyn AnnotationConsumer>> {
        let printer = self.printer.begin_annotation(descriptor, visible);
        let downstream = match &mut self.downstream {
            Some(downstream) => Some(downstream.visit_annotation(descriptor, visible)?),
            None => None,
        };
        Ok(Box::new(AnnotationTracer {
            printer,
            downstream,
        }))
    }

    fn visit_field(
        &mut self,
        access: AccessFlags,
        name: &str,
        descriptor: &str,
        signature: Option<&str>,
        value: Option<&Constant>,
    ) -> Result<Box<dyn FieldConsumer>> {
        let printer = self
            .printer
            .begin_field(access, name, descriptor, signature, value)?;
        let downstream = match &mut self.downstream {
            Some(downstream) => {
                Some(downstream.visit_field(access, name, descriptor, signature, value)?)
            }
            None => None,
        };
        Ok(Box::new(FieldTracer {
            printer,
            downstream,
        }))
    }

    fn visit_method(
        &mut self,
        access: AccessFlags,
        name: &str,
        descriptor: &str,
        signature: Option<&str>,
        exceptions: &[&str],
    ) -> Result<Box<dyn MethodConsumer>> {
        let printer = self
            .printer
            .begin_method(access, name, descriptor, signature, exceptions)?;
        let downstream = match &mut self.downstream {
            Some(downstream) => {
                Some(downstream.visit_method(access, name, descriptor, signature, exceptions)?)
            }
            None => None,
        };
        Ok(Box::new(MethodTracer {
            printer,
            downstream,
        }))
    }

    fn visit_end(&mut self) -> Result<()> {
        self.printer.visit_end()?;
        if let Some(downstream) = &mut self.downstream {
            downstream.visit_end()?;
        }
        Ok(())
    }
}

/// Tees field events.
pub struct FieldTracer {
    printer: FieldPrinter,
    downstream: Option<Box<dyn FieldConsumer>>,
}

impl FieldConsumer for FieldTracer {
    fn visit_annotation(
        &mut self,
        descriptor: &str,
        visible: bool,
    ) -> Result<Box<dyn AnnotationConsumer>> {
        let printer = self.printer.begin_annotation(descriptor, visible);
        let downstream = match &mut self.downstream {
            Some(downstream) => Some(downstream.visit_annotation(descriptor, visible)?),
            None => None,
        };
        Ok(Box::new(AnnotationTracer {
            printer,
            downstream,
        }))
    }

    fn visit_end(&mut self) -> Result<()> {
        self.printer.visit_end()?;
        if let Some(downstream) = &mut self.downstream {
            downstream.visit_end()?;
        }
        Ok(())
    }
}

/// Tees method events.
pub struct MethodTracer {
    printer: MethodPrinter,
    downstream: Option<Box<dyn MethodConsumer>>,
}

/// Renders on the printer, then forwards the identical event downstream.
macro_rules! tee {
    ($self:ident, $method:ident ( $($arg:expr),* )) => {{
        $self.printer.$method($($arg),*)?;
        if let Some(downstream) = &mut $self.downstream {
            downstream.$method($($arg),*)?;
        }
        Ok(())
    }};
}

impl MethodConsumer for MethodTracer {
    fn visit_annotation(
        &mut self,
        descriptor: &str,
        visible: bool,
    ) -> Result<Box<dyn AnnotationConsumer>> {
        let printer = self.printer.visit_annotation(descriptor, visible)?;
        let downstream = match &mut self.downstream {
            Some(downstream) => Some(downstream.visit_annotation(descriptor, visible)?),
            None => None,
        };
        Ok(Box::new(BoxedAnnotationTracer {
            printer,
            downstream,
        }))
    }

    fn visit_annotation_default(&mut self) -> Result<Box<dyn AnnotationConsumer>> {
        let printer = self.printer.visit_annotation_default()?;
        let downstream = match &mut self.downstream {
            Some(downstream) => Some(downstream.visit_annotation_default()?),
            None => None,
        };
        Ok(Box::new(BoxedAnnotationTracer {
            printer,
            downstream,
        }))
    }

    fn visit_parameter_annotation(
        &mut self,
        parameter: u32,
        descriptor: &str,
        visible: bool,
    ) -> Result<Box<dyn AnnotationConsumer>> {
        let printer = self
            .printer
            .visit_parameter_annotation(parameter, descriptor, visible)?;
        let downstream = match &mut self.downstream {
            Some(downstream) => {
                Some(downstream.visit_parameter_annotation(parameter, descriptor, visible)?)
            }
            None => None,
        };
        Ok(Box::new(BoxedAnnotationTracer {
            printer,
            downstream,
        }))
    }

    fn visit_code(&mut self) -> Result<()> {
        tee!(self, visit_code())
    }

    fn visit_frame(&mut self, frame: &StackFrame) -> Result<()> {
        tee!(self, visit_frame(frame))
    }

    fn visit_insn(&mut self, opcode: u8) -> Result<()> {
        tee!(self, visit_insn(opcode))
    }

    fn visit_int_insn(&mut self, opcode: u8, operand: i32) -> Result<()> {
        tee!(self, visit_int_insn(opcode, operand))
    }

    fn visit_var_insn(&mut self, opcode: u8, var: i32) -> Result<()> {
        tee!(self, visit_var_insn(opcode, var))
    }

    fn visit_type_insn(&mut self, opcode: u8, type_name: &str) -> Result<()> {
        tee!(self, visit_type_insn(opcode, type_name))
    }

    fn visit_field_insn(
        &mut self,
        opcode: u8,
        owner: &str,
        name: &str,
        descriptor: &str,
    ) -> Result<()> {
        tee!(self, visit_field_insn(opcode, owner, name, descriptor))
    }

    fn visit_method_insn(
        &mut self,
        opcode: u8,
        owner: &str,
        name: &str,
        descriptor: &str,
    ) -> Result<()> {
        tee!(self, visit_method_insn(opcode, owner, name, descriptor))
    }

    fn visit_invoke_dynamic(
        &mut self,
        name: &str,
        descriptor: &str,
        bootstrap: &Handle,
        arguments: &[BootstrapArgument],
    ) -> Result<()> {
        tee!(
            self,
            visit_invoke_dynamic(name, descriptor, bootstrap, arguments)
        )
    }

    fn visit_jump_insn(&mut self, opcode: u8, label: Label) -> Result<()> {
        tee!(self, visit_jump_insn(opcode, label))
    }

    fn visit_label(&mut self, label: Label) -> Result<()> {
        tee!(self, visit_label(label))
    }

    fn visit_ldc_insn(&mut self, constant: &Constant) -> Result<()> {
        tee!(self, visit_ldc_insn(constant))
    }

    fn visit_iinc_insn(&mut self, var: i32, increment: i32) -> Result<()> {
        tee!(self, visit_iinc_insn(var, increment))
    }

    fn visit_table_switch(
        &mut self,
        min: i32,
        max: i32,
        default: Label,
        labels: &[Label],
    ) -> Result<()> {
        tee!(self, visit_table_switch(min, max, default, labels))
    }

    fn visit_lookup_switch(
        &mut self,
        default: Label,
        keys: &[i32],
        labels: &[Label],
    ) -> Result<()> {
        tee!(self, visit_lookup_switch(default, keys, labels))
    }

    fn visit_multi_new_array(&mut self, descriptor: &str, dimensions: i32) -> Result<()> {
        tee!(self, visit_multi_new_array(descriptor, dimensions))
    }

    fn visit_try_catch(
        &mut self,
        start: Label,
        end: Label,
        handler: Label,
        catch_type: Option<&str>,
    ) -> Result<()> {
        tee!(self, visit_try_catch(start, end, handler, catch_type))
    }

    fn visit_local_variable(
        &mut self,
        name: &str,
        descriptor: &str,
        signature: Option<&str>,
        start: Label,
        end: Label,
        index: i32,
    ) -> Result<()> {
        tee!(
            self,
            visit_local_variable(name, descriptor, signature, start, end, index)
        )
    }

    fn visit_line_number(&mut self, line: i32, start: Label) -> Result<()> {
        tee!(self, visit_line_number(line, start))
    }

    fn visit_maxs(&mut self, max_stack: i32, max_locals: i32) -> Result<()> {
        tee!(self, visit_maxs(max_stack, max_locals))
    }

    fn visit_end(&mut self) -> Result<()> {
        tee!(self, visit_end())
    }
}

/// Tees annotation events; the printer side is a concrete value.
pub struct AnnotationTracer {
    printer: AnnotationPrinter,
    downstream: Option<Box<dyn AnnotationConsumer>>,
}

/// Same tee, for scopes whose printer side arrived already boxed.
struct BoxedAnnotationTracer {
    printer: Box<dyn AnnotationConsumer>,
    downstream: Option<Box<dyn AnnotationConsumer>>,
}

macro_rules! annotation_tee_impl {
    ($name:ident) => {
        impl AnnotationConsumer for $name {
            fn visit_value(
                &mut self,
                name: Option<&str>,
                value: &AnnotationValue,
            ) -> Result<()> {
                tee!(self, visit_value(name, value))
            }

            fn visit_enum(
                &mut self,
                name: Option<&str>,
                descriptor: &str,
                value: &str,
            ) -> Result<()> {
                tee!(self, visit_enum(name, descriptor, value))
            }

            fn visit_nested(
                &mut self,
                name: Option<&str>,
                descriptor: &str,
            ) -> Result<Box<dyn AnnotationConsumer>> {
                let printer = self.printer.visit_nested(name, descriptor)?;
                let downstream = match &mut self.downstream {
                    Some(downstream) => Some(downstream.visit_nested(name, descriptor)?),
                    None => None,
                };
                Ok(Box::new(BoxedAnnotationTracer {
                    printer,
                    downstream,
                }))
            }

            fn visit_array(&mut self, name: Option<&str>) -> Result<Box<dyn AnnotationConsumer>> {
                let printer = self.printer.visit_array(name)?;
                let downstream = match &mut self.downstream {
                    Some(downstream) => Some(downstream.visit_array(name)?),
                    None => None,
                };
                Ok(Box::new(BoxedAnnotationTracer {
                    printer,
                    downstream,
                }))
            }

            fn visit_end(&mut self) -> Result<()> {
                tee!(self, visit_end())
            }
        }
    };
}

annotation_tee_impl!(AnnotationTracer);
annotation_tee_impl!(BoxedAnnotationTracer);

#[cfg(test)]
mod test {
    use super::*;
    use crate::opcodes;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records one line per received event, shared across scope consumers.
    #[derive(Clone, Default)]
    struct Recorder {
        events: Rc<RefCell<Vec<String>>>,
    }

    impl Recorder {
        fn log(&self, event: impl Into<String>) {
            self.events.borrow_mut().push(event.into());
        }

        fn taken(&self) -> Vec<String> {
            self.events.borrow().clone()
        }
    }

    impl ClassConsumer for Recorder {
        fn visit_header(
            &mut self,
            version: u32,
            _access: AccessFlags,
            name: &str,
            _signature: Option<&str>,
            _super_name: Option<&str>,
            _interfaces: &[&str],
        ) -> Result<()> {
            self.log(format!("header {} {}", version, name));
            Ok(())
        }

        fn visit_source(&mut self, file: Option<&str>, _debug: Option<&str>) -> Result<()> {
            self.log(format!("source {:?}", file));
            Ok(())
        }

        fn visit_outer_class(
            &mut self,
            owner: &str,
            _name: Option<&str>,
            _descriptor: Option<&str>,
        ) -> Result<()> {
            self.log(format!("outer {}", owner));
            Ok(())
        }

        fn visit_inner_class(
            &mut self,
            name: &str,
            _outer_name: Option<&str>,
            _inner_name: Option<&str>,
            _access: AccessFlags,
        ) -> Result<()> {
            self.log(format!("inner {}", name));
            Ok(())
        }

        fn visit_annotation(
            &mut self,
            descriptor: &str,
            _visible: bool,
        ) -> Result<Box<dyn AnnotationConsumer>> {
            self.log(format!("annotation {}", descriptor));
            Ok(Box::new(self.clone()))
        }

        fn visit_field(
            &mut self,
            _access: AccessFlags,
            name: &str,
            _descriptor: &str,
            _signature: Option<&str>,
            _value: Option<&Constant>,
        ) -> Result<Box<dyn FieldConsumer>> {
            self.log(format!("field {}", name));
            Ok(Box::new(self.clone()))
        }

        fn visit_method(
            &mut self,
            _access: AccessFlags,
            name: &str,
            _descriptor: &str,
            _signature: Option<&str>,
            _exceptions: &[&str],
        ) -> Result<Box<dyn MethodConsumer>> {
            self.log(format!("method {}", name));
            Ok(Box::new(self.clone()))
        }

        fn visit_end(&mut self) -> Result<()> {
            self.log("class end");
            Ok(())
        }
    }

    impl FieldConsumer for Recorder {
        fn visit_annotation(
            &mut self,
            descriptor: &str,
            _visible: bool,
        ) -> Result<Box<dyn AnnotationConsumer>> {
            self.log(format!("field annotation {}", descriptor));
            Ok(Box::new(self.clone()))
        }

        fn visit_end(&mut self) -> Result<()> {
            self.log("field end");
            Ok(())
        }
    }

    impl AnnotationConsumer for Recorder {
        fn visit_value(&mut self, name: Option<&str>, _value: &AnnotationValue) -> Result<()> {
            self.log(format!("value {:?}", name));
            Ok(())
        }

        fn visit_enum(
            &mut self,
            _name: Option<&str>,
            descriptor: &str,
            value: &str,
        ) -> Result<()> {
            self.log(format!("enum {}.{}", descriptor, value));
            Ok(())
        }

        fn visit_nested(
            &mut self,
            _name: Option<&str>,
            descriptor: &str,
        ) -> Result<Box<dyn AnnotationConsumer>> {
            self.log(format!("nested {}", descriptor));
            Ok(Box::new(self.clone()))
        }

        fn visit_array(&mut self, name: Option<&str>) -> Result<Box<dyn AnnotationConsumer>> {
            self.log(format!("array {:?}", name));
            Ok(Box::new(self.clone()))
        }

        fn visit_end(&mut self) -> Result<()> {
            self.log("annotation end");
            Ok(())
        }
    }

    impl MethodConsumer for Recorder {
        fn visit_annotation(
            &mut self,
            descriptor: &str,
            _visible: bool,
        ) -> Result<Box<dyn AnnotationConsumer>> {
            self.log(format!("method annotation {}", descriptor));
            Ok(Box::new(self.clone()))
        }

        fn visit_annotation_default(&mut self) -> Result<Box<dyn AnnotationConsumer>> {
            self.log("annotation default");
            Ok(Box::new(self.clone()))
        }

        fn visit_parameter_annotation(
            &mut self,
            parameter: u32,
            descriptor: &str,
            _visible: bool,
        ) -> Result<Box<dyn AnnotationConsumer>> {
            self.log(format!("parameter annotation {} {}", parameter, descriptor));
            Ok(Box::new(self.clone()))
        }

        fn visit_code(&mut self) -> Result<()> {
            self.log("code");
            Ok(())
        }

        fn visit_frame(&mut self, _frame: &StackFrame) -> Result<()> {
            self.log("frame");
            Ok(())
        }

        fn visit_insn(&mut self, opcode: u8) -> Result<()> {
            self.log(format!("insn {}", opcode));
            Ok(())
        }

        fn visit_int_insn(&mut self, opcode: u8, operand: i32) -> Result<()> {
            self.log(format!("int insn {} {}", opcode, operand));
            Ok(())
        }

        fn visit_var_insn(&mut self, opcode: u8, var: i32) -> Result<()> {
            self.log(format!("var insn {} {}", opcode, var));
            Ok(())
        }

        fn visit_type_insn(&mut self, opcode: u8, type_name: &str) -> Result<()> {
            self.log(format!("type insn {} {}", opcode, type_name));
            Ok(())
        }

        fn visit_field_insn(
            &mut self,
            _opcode: u8,
            owner: &str,
            name: &str,
            _descriptor: &str,
        ) -> Result<()> {
            self.log(format!("field insn {}.{}", owner, name));
            Ok(())
        }

        fn visit_method_insn(
            &mut self,
            _opcode: u8,
            owner: &str,
            name: &str,
            _descriptor: &str,
        ) -> Result<()> {
            self.log(format!("method insn {}.{}", owner, name));
            Ok(())
        }

        fn visit_invoke_dynamic(
            &mut self,
            name: &str,
            _descriptor: &str,
            _bootstrap: &Handle,
            _arguments: &[BootstrapArgument],
        ) -> Result<()> {
            self.log(format!("invokedynamic {}", name));
            Ok(())
        }

        fn visit_jump_insn(&mut self, opcode: u8, label: Label) -> Result<()> {
            self.log(format!("jump {} {:?}", opcode, label));
            Ok(())
        }

        fn visit_label(&mut self, label: Label) -> Result<()> {
            self.log(format!("label {:?}", label));
            Ok(())
        }

        fn visit_ldc_insn(&mut self, constant: &Constant) -> Result<()> {
            self.log(format!("ldc {:?}", constant));
            Ok(())
        }

        fn visit_iinc_insn(&mut self, var: i32, increment: i32) -> Result<()> {
            self.log(format!("iinc {} {}", var, increment));
            Ok(())
        }

        fn visit_table_switch(
            &mut self,
            min: i32,
            max: i32,
            _default: Label,
            _labels: &[Label],
        ) -> Result<()> {
            self.log(format!("tableswitch {}..{}", min, max));
            Ok(())
        }

        fn visit_lookup_switch(
            &mut self,
            _default: Label,
            keys: &[i32],
            _labels: &[Label],
        ) -> Result<()> {
            self.log(format!("lookupswitch {:?}", keys));
            Ok(())
        }

        fn visit_multi_new_array(&mut self, descriptor: &str, dimensions: i32) -> Result<()> {
            self.log(format!("multianewarray {} {}", descriptor, dimensions));
            Ok(())
        }

        fn visit_try_catch(
            &mut self,
            _start: Label,
            _end: Label,
            _handler: Label,
            catch_type: Option<&str>,
        ) -> Result<()> {
            self.log(format!("trycatch {:?}", catch_type));
            Ok(())
        }

        fn visit_local_variable(
            &mut self,
            name: &str,
            _descriptor: &str,
            _signature: Option<&str>,
            _start: Label,
            _end: Label,
            _index: i32,
        ) -> Result<()> {
            self.log(format!("localvariable {}", name));
            Ok(())
        }

        fn visit_line_number(&mut self, line: i32, _start: Label) -> Result<()> {
            self.log(format!("linenumber {}", line));
            Ok(())
        }

        fn visit_maxs(&mut self, max_stack: i32, max_locals: i32) -> Result<()> {
            self.log(format!("maxs {} {}", max_stack, max_locals));
            Ok(())
        }

        fn visit_end(&mut self) -> Result<()> {
            self.log("method end");
            Ok(())
        }
    }

    #[test]
    fn downstream_receives_events_in_order() {
        let recorder = Recorder::default();
        let mut tracer = ClassTracer::new(Some(Box::new(recorder.clone())));

        tracer
            .visit_header(50, AccessFlags::SUPER, "Hello", None, Some("java/lang/Object"), &[])
            .unwrap();
        tracer.visit_source(Some("Hello.java"), None).unwrap();
        let mut method = tracer
            .visit_method(AccessFlags::PUBLIC, "run", "()V", None, &[])
            .unwrap();
        method.visit_code().unwrap();
        method.visit_insn(opcodes::RETURN).unwrap();
        method.visit_maxs(0, 1).unwrap();
        method.visit_end().unwrap();
        drop(method);
        tracer.visit_end().unwrap();

        assert_eq!(
            recorder.taken(),
            vec![
                "header 50 Hello",
                "source Some(\"Hello.java\")",
                "method run",
                "code",
                format!("insn {}", opcodes::RETURN).as_str(),
                "maxs 0 1",
                "method end",
                "class end",
            ]
        );
    }

    #[test]
    fn renders_while_forwarding() {
        let recorder = Recorder::default();
        let mut tracer = ClassTracer::new(Some(Box::new(recorder.clone())));
        tracer
            .visit_header(
                50,
                AccessFlags::PUBLIC | AccessFlags::SUPER,
                "Hello",
                None,
                Some("java/lang/Object"),
                &[],
            )
            .unwrap();
        tracer.visit_end().unwrap();

        assert!(tracer.render().contains("public class Hello {"));
        assert_eq!(recorder.taken().len(), 2);
    }

    #[test]
    fn absent_downstream_is_fine() {
        let mut tracer = ClassTracer::new(None);
        tracer
            .visit_header(49, AccessFlags::SUPER, "Hello", None, Some("java/lang/Object"), &[])
            .unwrap();
        let mut field = tracer
            .visit_field(AccessFlags::PRIVATE, "x", "I", None, None)
            .unwrap();
        field.visit_end().unwrap();
        tracer.visit_end().unwrap();
        assert!(tracer.render().contains("private I x"));
    }

    #[test]
    fn annotation_events_are_teed() {
        let recorder = Recorder::default();
        let mut tracer = ClassTracer::new(Some(Box::new(recorder.clone())));
        let mut annotation = tracer.visit_annotation("LMarked;", true).unwrap();
        annotation
            .visit_value(Some("count"), &AnnotationValue::Int(3))
            .unwrap();
        let mut array = annotation.visit_array(Some("names")).unwrap();
        array
            .visit_value(None, &AnnotationValue::Str(String::from("a")))
            .unwrap();
        array.visit_end().unwrap();
        annotation.visit_end().unwrap();

        assert_eq!(
            recorder.taken(),
            vec![
                "annotation LMarked;",
                "value Some(\"count\")",
                "array Some(\"names\")",
                "value None",
                "annotation end",
                "annotation end",
            ]
        );
        assert!(tracer.render().contains("count=3"));
    }

    #[test]
    fn flush_to_writes_the_listing() {
        let mut tracer = ClassTracer::new(None);
        tracer
            .visit_header(49, AccessFlags::SUPER, "Hello", None, Some("java/lang/Object"), &[])
            .unwrap();
        tracer.visit_end().unwrap();

        let mut sink = Vec::new();
        tracer.flush_to(&mut sink).unwrap();
        let written = String::from_utf8(sink).unwrap();
        assert_eq!(written, tracer.render());
    }
}
