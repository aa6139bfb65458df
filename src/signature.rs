//! Descriptor and generic-signature grammars
//!
//! Type descriptors (`I`, `Ljava/lang/String;`, `([I)V`) and the richer
//! generic signatures are opaque payload to the rendering consumers, but the
//! checking consumers parse them structurally to reject malformed input.
//! Both grammars are LL(1)-ish, so everything here is plain recursive
//! descent over a cursor position: success advances the cursor, failure is
//! an error naming the offending index. There is no backtracking.
//!
//! The signature parser also doubles as the source of the `// declaration:`
//! comments in disassembly: walking the grammar re-emits Java-like generic
//! syntax (`<T extends Comparable<T>>`, wildcards, `[]` arrays).

use crate::errors::{Error, Result};

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Check that `name` is a valid unqualified identifier.
pub fn check_identifier(name: &str, what: &str) -> Result<()> {
    let mut chars = name.chars();
    match chars.next() {
        None => {
            return Err(Error::InvalidArgument(format!(
                "Invalid {} (must not be empty)",
                what
            )))
        }
        Some(c) if !is_identifier_start(c) => {
            return Err(Error::InvalidArgument(format!(
                "Invalid {} (must be a valid identifier): {}",
                what, name
            )))
        }
        Some(_) => {}
    }
    if chars.any(|c| !is_identifier_part(c)) {
        return Err(Error::InvalidArgument(format!(
            "Invalid {} (must be a valid identifier): {}",
            what, name
        )));
    }
    Ok(())
}

/// Check a method name: a valid identifier, `<init>`, or `<clinit>`.
pub fn check_method_identifier(name: &str, what: &str) -> Result<()> {
    if name == "<init>" || name == "<clinit>" {
        return Ok(());
    }
    check_identifier(name, what).map_err(|_| {
        Error::InvalidArgument(format!(
            "Invalid {} (must be '<init>', '<clinit>' or a valid identifier): {}",
            what, name
        ))
    })
}

/// Check an internal (slash-separated) class name. Array type names, which
/// start with `[`, are validated as descriptors instead.
pub fn check_internal_name(name: &str, what: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidArgument(format!(
            "Invalid {} (must not be empty)",
            what
        )));
    }
    if name.starts_with('[') {
        return check_descriptor(name, false);
    }
    for segment in name.split('/') {
        check_identifier(segment, what).map_err(|_| {
            Error::InvalidArgument(format!(
                "Invalid {} (must be a fully qualified class name in internal form): {}",
                what, name
            ))
        })?;
    }
    Ok(())
}

fn bad_descriptor(desc: &str) -> Error {
    Error::InvalidArgument(format!("Invalid descriptor: {}", desc))
}

/// Parse one type descriptor starting at byte offset `start`, returning the
/// offset just past it. `can_be_void` permits `V`.
pub fn parse_descriptor(desc: &str, start: usize, can_be_void: bool) -> Result<usize> {
    let bytes = desc.as_bytes();
    match bytes.get(start) {
        None => Err(Error::InvalidArgument(String::from(
            "Invalid type descriptor (must not be empty)",
        ))),
        Some(b'V') => {
            if can_be_void {
                Ok(start + 1)
            } else {
                Err(bad_descriptor(desc))
            }
        }
        Some(b'Z' | b'C' | b'B' | b'S' | b'I' | b'F' | b'J' | b'D') => Ok(start + 1),
        Some(b'[') => {
            let mut index = start + 1;
            while bytes.get(index) == Some(&b'[') {
                index += 1;
            }
            if index < bytes.len() {
                parse_descriptor(desc, index, false)
            } else {
                Err(bad_descriptor(desc))
            }
        }
        Some(b'L') => {
            let semicolon = desc[start..]
                .find(';')
                .map(|i| start + i)
                .ok_or_else(|| bad_descriptor(desc))?;
            if semicolon - start < 2 {
                return Err(bad_descriptor(desc));
            }
            check_internal_name(&desc[start + 1..semicolon], "class name")
                .map_err(|_| bad_descriptor(desc))?;
            Ok(semicolon + 1)
        }
        Some(_) => Err(bad_descriptor(desc)),
    }
}

/// Check that `desc` is exactly one type descriptor.
pub fn check_descriptor(desc: &str, can_be_void: bool) -> Result<()> {
    let end = parse_descriptor(desc, 0, can_be_void)?;
    if end != desc.len() {
        return Err(bad_descriptor(desc));
    }
    Ok(())
}

/// Check that `desc` is a method descriptor: `(` non-void parameter
/// descriptors `)` return descriptor (void allowed).
pub fn check_method_descriptor(desc: &str) -> Result<()> {
    let bytes = desc.as_bytes();
    if bytes.first() != Some(&b'(') || desc.len() < 3 {
        return Err(bad_descriptor(desc));
    }
    let mut index = 1;
    while bytes.get(index) != Some(&b')') {
        if bytes.get(index) == Some(&b'V') {
            return Err(bad_descriptor(desc));
        }
        index = parse_descriptor(desc, index, false)?;
        if index >= desc.len() {
            return Err(bad_descriptor(desc));
        }
    }
    let end = parse_descriptor(desc, index + 1, true)?;
    if end != desc.len() {
        return Err(bad_descriptor(desc));
    }
    Ok(())
}

/// Java source name for a base type descriptor character.
fn base_type_name(c: char) -> Option<&'static str> {
    Some(match c {
        'B' => "byte",
        'C' => "char",
        'D' => "double",
        'F' => "float",
        'I' => "int",
        'J' => "long",
        'S' => "short",
        'Z' => "boolean",
        'V' => "void",
        _ => return None,
    })
}

/// Recursive-descent walker over a generic signature.
///
/// Every production both validates and renders, so the checking consumers
/// and the declaration comments share one grammar implementation.
struct SignatureParser<'a> {
    sig: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> SignatureParser<'a> {
    fn new(sig: &'a str) -> SignatureParser<'a> {
        SignatureParser {
            sig,
            chars: sig.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn expect(&mut self, c: char) -> Result<()> {
        if self.peek() == Some(c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(Error::InvalidArgument(format!(
                "{}: '{}' expected at index {}",
                self.sig, c, self.pos
            )))
        }
    }

    fn finished(&self) -> Result<()> {
        if self.pos == self.chars.len() {
            Ok(())
        } else {
            Err(Error::InvalidArgument(format!(
                "{}: error at index {}",
                self.sig, self.pos
            )))
        }
    }

    fn identifier(&mut self) -> Result<String> {
        match self.peek() {
            Some(c) if is_identifier_start(c) => {}
            _ => {
                return Err(Error::InvalidArgument(format!(
                    "{}: identifier expected at index {}",
                    self.sig, self.pos
                )))
            }
        }
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if !is_identifier_part(c) {
                break;
            }
            name.push(c);
            self.pos += 1;
        }
        Ok(name)
    }

    /// FormalTypeParameters: `<` FormalTypeParameter+ `>`
    ///
    /// Renders as `<T extends Bound & Bound, U>`; a sole `java.lang.Object`
    /// bound is suppressed.
    fn formal_type_parameters(&mut self) -> Result<String> {
        self.expect('<')?;
        let mut out = String::from("<");
        let mut first = true;
        loop {
            if !first {
                out.push_str(", ");
            }
            first = false;

            out.push_str(&self.identifier()?);
            self.expect(':')?;
            let mut bounds = vec![];
            if matches!(self.peek(), Some('L' | '[' | 'T')) {
                bounds.push(self.field_type_signature()?);
            }
            while self.peek() == Some(':') {
                self.pos += 1;
                bounds.push(self.field_type_signature()?);
            }
            if bounds.len() > 1 && bounds[0] == "java.lang.Object" {
                bounds.remove(0);
            }
            if !(bounds.is_empty() || bounds == ["java.lang.Object"]) {
                out.push_str(" extends ");
                out.push_str(&bounds.join(" & "));
            }

            if self.peek() == Some('>') {
                self.pos += 1;
                out.push('>');
                return Ok(out);
            }
        }
    }

    /// ClassTypeSignature:
    /// `L` Identifier (`/` Identifier)* TypeArguments?
    /// (`.` Identifier TypeArguments?)* `;`
    fn class_type_signature(&mut self) -> Result<String> {
        self.expect('L')?;
        let mut name = self.identifier()?;
        while self.peek() == Some('/') {
            self.pos += 1;
            name.push('.');
            name.push_str(&self.identifier()?);
        }
        if self.peek() == Some('<') {
            name.push_str(&self.type_arguments()?);
        }
        while self.peek() == Some('.') {
            self.pos += 1;
            name.push('.');
            name.push_str(&self.identifier()?);
            if self.peek() == Some('<') {
                name.push_str(&self.type_arguments()?);
            }
        }
        self.expect(';')?;
        Ok(name)
    }

    /// TypeArguments: `<` TypeArgument+ `>`
    fn type_arguments(&mut self) -> Result<String> {
        self.expect('<')?;
        let mut out = String::from("<");
        let mut first = true;
        loop {
            if !first {
                out.push_str(", ");
            }
            first = false;
            out.push_str(&self.type_argument()?);
            if self.peek() == Some('>') {
                self.pos += 1;
                out.push('>');
                return Ok(out);
            }
        }
    }

    /// TypeArgument: `*` | (`+` | `-`)? FieldTypeSignature
    fn type_argument(&mut self) -> Result<String> {
        match self.peek() {
            Some('*') => {
                self.pos += 1;
                Ok(String::from("?"))
            }
            Some('+') => {
                self.pos += 1;
                Ok(format!("? extends {}", self.field_type_signature()?))
            }
            Some('-') => {
                self.pos += 1;
                Ok(format!("? super {}", self.field_type_signature()?))
            }
            _ => self.field_type_signature(),
        }
    }

    /// FieldTypeSignature:
    /// ClassTypeSignature | ArrayTypeSignature | TypeVariableSignature
    fn field_type_signature(&mut self) -> Result<String> {
        match self.peek() {
            Some('L') => self.class_type_signature(),
            Some('[') => {
                self.pos += 1;
                Ok(format!("{}[]", self.type_signature()?))
            }
            _ => self.type_variable_signature(),
        }
    }

    /// TypeVariableSignature: `T` Identifier `;`
    fn type_variable_signature(&mut self) -> Result<String> {
        self.expect('T')?;
        let name = self.identifier()?;
        self.expect(';')?;
        Ok(name)
    }

    /// TypeSignature: a base type or a FieldTypeSignature
    fn type_signature(&mut self) -> Result<String> {
        if let Some(name) = self.peek().and_then(|c| {
            if c == 'V' {
                None
            } else {
                base_type_name(c)
            }
        }) {
            self.pos += 1;
            return Ok(String::from(name));
        }
        self.field_type_signature()
    }
}

/// Validate a class signature and render the Java-like suffix of the class
/// declaration: formal type parameters, `extends`, and `implements`
/// (`extends` for superinterfaces when `interface` is set). A
/// `java.lang.Object` superclass is omitted.
pub fn class_declaration(sig: &str, interface: bool) -> Result<String> {
    let mut parser = SignatureParser::new(sig);
    let mut out = String::new();
    if parser.peek() == Some('<') {
        out.push_str(&parser.formal_type_parameters()?);
    }
    let superclass = parser.class_type_signature()?;
    let mut interfaces = vec![];
    while parser.peek() == Some('L') {
        interfaces.push(parser.class_type_signature()?);
    }
    parser.finished()?;

    if superclass != "java.lang.Object" {
        out.push_str(" extends ");
        out.push_str(&superclass);
    }
    if !interfaces.is_empty() {
        out.push_str(if interface {
            " extends "
        } else {
            " implements "
        });
        out.push_str(&interfaces.join(", "));
    }
    Ok(out)
}

/// Validate a field or type signature and render the Java-like type.
pub fn type_declaration(sig: &str) -> Result<String> {
    let mut parser = SignatureParser::new(sig);
    let decl = parser.field_type_signature()?;
    parser.finished()?;
    Ok(decl)
}

/// The pieces of a method declaration derived from its generic signature.
pub struct MethodDeclaration {
    /// Formal type parameters plus parenthesized parameter list
    pub declaration: String,
    pub return_type: String,
    /// Thrown types, if the signature declares any
    pub exceptions: Option<String>,
}

/// Validate a method signature and render its declaration pieces.
pub fn method_declaration(sig: &str) -> Result<MethodDeclaration> {
    let mut parser = SignatureParser::new(sig);
    let mut declaration = String::new();
    if parser.peek() == Some('<') {
        declaration.push_str(&parser.formal_type_parameters()?);
    }
    parser.expect('(')?;
    let mut parameters = vec![];
    while matches!(
        parser.peek(),
        Some('Z' | 'C' | 'B' | 'S' | 'I' | 'F' | 'J' | 'D' | 'L' | '[' | 'T')
    ) {
        parameters.push(parser.type_signature()?);
    }
    parser.expect(')')?;
    let return_type = if parser.peek() == Some('V') {
        parser.bump();
        String::from("void")
    } else {
        parser.type_signature()?
    };
    let mut thrown = vec![];
    while parser.peek() == Some('^') {
        parser.bump();
        if parser.peek() == Some('L') {
            thrown.push(parser.class_type_signature()?);
        } else {
            thrown.push(parser.type_variable_signature()?);
        }
    }
    parser.finished()?;

    declaration.push('(');
    declaration.push_str(&parameters.join(", "));
    declaration.push(')');
    Ok(MethodDeclaration {
        declaration,
        return_type,
        exceptions: if thrown.is_empty() {
            None
        } else {
            Some(thrown.join(", "))
        },
    })
}

/// Check a class signature without keeping the rendering.
pub fn check_class_signature(sig: &str) -> Result<()> {
    class_declaration(sig, false).map(|_| ())
}

/// Check a method signature without keeping the rendering.
pub fn check_method_signature(sig: &str) -> Result<()> {
    method_declaration(sig).map(|_| ())
}

/// Check a field signature without keeping the rendering.
pub fn check_field_signature(sig: &str) -> Result<()> {
    type_declaration(sig).map(|_| ())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn descriptors_consume_their_full_length() {
        assert_eq!(parse_descriptor("Ljava/lang/String;", 0, false).unwrap(), 18);
        assert_eq!(parse_descriptor("[[I", 0, false).unwrap(), 3);
        assert_eq!(parse_descriptor("V", 0, true).unwrap(), 1);
        assert!(parse_descriptor("V", 0, false).is_err());
    }

    #[test]
    fn descriptor_rejections() {
        assert!(check_descriptor("", false).is_err());
        assert!(check_descriptor("X", false).is_err());
        assert!(check_descriptor("L;", false).is_err());
        assert!(check_descriptor("Ljava/lang/String", false).is_err());
        assert!(check_descriptor("[", false).is_err());
        assert!(check_descriptor("II", false).is_err());
        assert!(check_descriptor("I ", false).is_err());
    }

    #[test]
    fn method_descriptors() {
        assert!(check_method_descriptor("()V").is_ok());
        assert!(check_method_descriptor("([Ljava/lang/String;)V").is_ok());
        assert!(check_method_descriptor("(IDLjava/lang/Integer;)Ljava/lang/Object;").is_ok());
        assert!(check_method_descriptor("(V)V").is_err());
        assert!(check_method_descriptor("()").is_err());
        assert!(check_method_descriptor("I").is_err());
        assert!(check_method_descriptor("()VV").is_err());
        assert!(check_method_descriptor("(I").is_err());
    }

    #[test]
    fn identifiers() {
        assert!(check_identifier("value", "name").is_ok());
        assert!(check_identifier("_x$1", "name").is_ok());
        assert!(check_identifier("", "name").is_err());
        assert!(check_identifier("1abc", "name").is_err());
        assert!(check_identifier("a-b", "name").is_err());

        assert!(check_method_identifier("<init>", "name").is_ok());
        assert!(check_method_identifier("<clinit>", "name").is_ok());
        assert!(check_method_identifier("<other>", "name").is_err());
        assert!(check_method_identifier("main", "name").is_ok());
    }

    #[test]
    fn internal_names() {
        assert!(check_internal_name("java/lang/Object", "class name").is_ok());
        assert!(check_internal_name("Hello", "class name").is_ok());
        assert!(check_internal_name("[Ljava/lang/Object;", "class name").is_ok());
        assert!(check_internal_name("java//lang", "class name").is_err());
        assert!(check_internal_name("java/lang/", "class name").is_err());
        assert!(check_internal_name("", "class name").is_err());
    }

    #[test]
    fn class_signatures() {
        assert!(check_class_signature("Ljava/lang/Object;").is_ok());
        assert!(check_class_signature(
            "<T:Ljava/lang/Object;>Ljava/lang/Object;Ljava/lang/Comparable<TT;>;"
        )
        .is_ok());
        // offending index is reported
        let err = check_class_signature("Ljava/lang/Object").unwrap_err();
        assert!(err.to_string().contains("index 17"), "{}", err);
    }

    #[test]
    fn class_declarations() {
        assert_eq!(
            class_declaration("Ljava/lang/Object;Ljava/lang/Runnable;", false).unwrap(),
            " implements java.lang.Runnable"
        );
        assert_eq!(
            class_declaration(
                "<T::Ljava/lang/Comparable<TT;>;>Ljava/lang/Object;Ljava/lang/Iterable<TT;>;",
                false
            )
            .unwrap(),
            "<T extends java.lang.Comparable<T>> implements java.lang.Iterable<T>"
        );
        assert_eq!(
            class_declaration("Ljava/util/AbstractList<Ljava/lang/String;>;", false).unwrap(),
            " extends java.util.AbstractList<java.lang.String>"
        );
    }

    #[test]
    fn type_declarations() {
        assert_eq!(
            type_declaration("Ljava/util/List<Ljava/lang/String;>;").unwrap(),
            "java.util.List<java.lang.String>"
        );
        assert_eq!(type_declaration("[[TT;").unwrap(), "T[][]");
        assert_eq!(
            type_declaration("Ljava/util/Map<+TK;-TV;>;").unwrap(),
            "java.util.Map<? extends K, ? super V>"
        );
        assert_eq!(
            type_declaration("Ljava/util/List<*>;").unwrap(),
            "java.util.List<?>"
        );
        assert_eq!(
            type_declaration("Ljava/util/Map$Entry<TK;TV;>;").unwrap(),
            "java.util.Map$Entry<K, V>"
        );
    }

    #[test]
    fn method_declarations() {
        let decl =
            method_declaration("<T:Ljava/lang/Object;>(TT;I)TT;^Ljava/io/IOException;").unwrap();
        assert_eq!(decl.declaration, "<T>(T, int)");
        assert_eq!(decl.return_type, "T");
        assert_eq!(decl.exceptions.as_deref(), Some("java.io.IOException"));

        let decl = method_declaration("()V").unwrap();
        assert_eq!(decl.declaration, "()");
        assert_eq!(decl.return_type, "void");
        assert!(decl.exceptions.is_none());
    }

    #[test]
    fn signature_rejections() {
        assert!(check_method_signature("(TT)V").is_err());
        assert!(check_field_signature("Q").is_err());
        assert!(check_field_signature("TT;x").is_err());
        assert!(check_class_signature("<>Ljava/lang/Object;").is_err());
    }
}
