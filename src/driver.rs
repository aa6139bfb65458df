//! Built-in sample event source
//!
//! The crate consumes structural events but does not parse class-file bytes;
//! that is the job of an external reader. For the command-line tools this
//! module plays the reader's role with a fixed demonstration class that
//! touches every scope kind: header, source info, an annotation, a field
//! with an initial value, a constructor, and a method with branches, a
//! switch, and stack frames.
//!
//! `debug` controls whether line-number and local-variable events are
//! included, mirroring a reader's skip-debug option.

use crate::errors::Result;
use crate::event::{
    AccessFlags, AnnotationValue, ClassConsumer, Constant, LabelGenerator, StackFrame,
};
use crate::opcodes;

/// Replay the demonstration class into `consumer`.
pub fn sample_class(consumer: &mut dyn ClassConsumer, debug: bool) -> Result<()> {
    consumer.visit_header(
        50,
        AccessFlags::PUBLIC | AccessFlags::SUPER,
        "Hello",
        None,
        Some("java/lang/Object"),
        &["java/lang/Runnable"],
    )?;
    if debug {
        consumer.visit_source(Some("Hello.java"), None)?;
    }

    {
        let mut annotation = consumer.visit_annotation("LSample;", true)?;
        annotation.visit_value(Some("value"), &AnnotationValue::Str(String::from("demo")))?;
        annotation.visit_end()?;
    }

    {
        let mut field = consumer.visit_field(
            AccessFlags::PRIVATE | AccessFlags::FINAL,
            "greeting",
            "Ljava/lang/String;",
            None,
            None,
        )?;
        field.visit_end()?;
    }

    {
        let mut labels = LabelGenerator::new();
        let start = labels.fresh_label();
        let end = labels.fresh_label();

        let mut method = consumer.visit_method(
            AccessFlags::PUBLIC,
            "<init>",
            "()V",
            None,
            &[],
        )?;
        method.visit_code()?;
        method.visit_label(start)?;
        if debug {
            method.visit_line_number(3, start)?;
        }
        method.visit_var_insn(opcodes::ALOAD, 0)?;
        method.visit_method_insn(
            opcodes::INVOKESPECIAL,
            "java/lang/Object",
            "<init>",
            "()V",
        )?;
        method.visit_var_insn(opcodes::ALOAD, 0)?;
        method.visit_ldc_insn(&Constant::Str(String::from("hello, world")))?;
        method.visit_field_insn(
            opcodes::PUTFIELD,
            "Hello",
            "greeting",
            "Ljava/lang/String;",
        )?;
        method.visit_insn(opcodes::RETURN)?;
        method.visit_label(end)?;
        if debug {
            method.visit_local_variable("this", "LHello;", None, start, end, 0)?;
        }
        method.visit_maxs(2, 1)?;
        method.visit_end()?;
    }

    {
        let mut labels = LabelGenerator::new();
        let start = labels.fresh_label();
        let end = labels.fresh_label();

        let mut method = consumer.visit_method(
            AccessFlags::PUBLIC,
            "run",
            "()V",
            None,
            &[],
        )?;
        method.visit_code()?;
        method.visit_label(start)?;
        if debug {
            method.visit_line_number(7, start)?;
        }
        method.visit_field_insn(
            opcodes::GETSTATIC,
            "java/lang/System",
            "out",
            "Ljava/io/PrintStream;",
        )?;
        method.visit_var_insn(opcodes::ALOAD, 0)?;
        method.visit_field_insn(
            opcodes::GETFIELD,
            "Hello",
            "greeting",
            "Ljava/lang/String;",
        )?;
        method.visit_method_insn(
            opcodes::INVOKEVIRTUAL,
            "java/io/PrintStream",
            "println",
            "(Ljava/lang/String;)V",
        )?;
        method.visit_insn(opcodes::RETURN)?;
        method.visit_label(end)?;
        if debug {
            method.visit_local_variable("this", "LHello;", None, start, end, 0)?;
        }
        method.visit_maxs(2, 1)?;
        method.visit_end()?;
    }

    {
        let mut labels = LabelGenerator::new();
        let case_zero = labels.fresh_label();
        let case_one = labels.fresh_label();
        let default = labels.fresh_label();

        let mut method = consumer.visit_method(
            AccessFlags::PUBLIC | AccessFlags::STATIC,
            "pick",
            "(I)I",
            None,
            &[],
        )?;
        method.visit_code()?;
        method.visit_var_insn(opcodes::ILOAD, 0)?;
        method.visit_table_switch(0, 1, default, &[case_zero, case_one])?;
        method.visit_label(case_zero)?;
        method.visit_frame(&StackFrame::Same)?;
        method.visit_insn(opcodes::ICONST_0)?;
        method.visit_insn(opcodes::IRETURN)?;
        method.visit_label(case_one)?;
        method.visit_frame(&StackFrame::Same)?;
        method.visit_insn(opcodes::ICONST_1)?;
        method.visit_insn(opcodes::IRETURN)?;
        method.visit_label(default)?;
        method.visit_frame(&StackFrame::Same)?;
        method.visit_var_insn(opcodes::ILOAD, 0)?;
        method.visit_insn(opcodes::IRETURN)?;
        method.visit_maxs(1, 1)?;
        method.visit_end()?;
    }

    consumer.visit_end()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::check::ClassChecker;
    use crate::trace::ClassTracer;

    fn listing(debug: bool) -> String {
        let tracer = ClassTracer::new(None);
        let text = tracer.text();
        let mut checker = ClassChecker::new(Box::new(tracer));
        sample_class(&mut checker, debug).unwrap();
        text.render()
    }

    #[test]
    fn sample_passes_the_checker() {
        let out = listing(false);
        assert!(out.contains("public class Hello"));
        assert!(out.contains("implements java/lang/Runnable"));
        assert!(out.contains("@LSample;(value=\"demo\")"));
        assert!(out.contains("LDC \"hello, world\""));
        assert!(out.contains("TABLESWITCH"));
        assert!(out.contains("FRAME SAME"));
        assert!(out.ends_with("}\n"));
    }

    #[test]
    fn debug_flag_toggles_debug_events() {
        let plain = listing(false);
        assert!(!plain.contains("LINENUMBER"));
        assert!(!plain.contains("LOCALVARIABLE"));
        assert!(!plain.contains("compiled from"));

        let debug = listing(true);
        assert!(debug.contains("// compiled from: Hello.java"));
        assert!(debug.contains("LINENUMBER 3"));
        assert!(debug.contains("LOCALVARIABLE this LHello;"));
    }
}
