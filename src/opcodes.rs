//! Instruction and operand-type lookup tables
//!
//! The tables map the numeric codes appearing in a class-file event stream to
//! their canonical mnemonics. Reserved instruction codes (the `_W` wide forms
//! and the short load/store variants that never appear as events) map to
//! `None`. Lookups with codes that never come out of real instruction
//! dispatch are a caller bug, not a runtime error.

/// Mnemonics for the instruction codes 0–199, `None` for reserved slots.
pub static OPCODES: [Option<&str>; 200] = [
    Some("NOP"),
    Some("ACONST_NULL"),
    Some("ICONST_M1"),
    Some("ICONST_0"),
    Some("ICONST_1"),
    Some("ICONST_2"),
    Some("ICONST_3"),
    Some("ICONST_4"),
    Some("ICONST_5"),
    Some("LCONST_0"),
    Some("LCONST_1"),
    Some("FCONST_0"),
    Some("FCONST_1"),
    Some("FCONST_2"),
    Some("DCONST_0"),
    Some("DCONST_1"),
    Some("BIPUSH"),
    Some("SIPUSH"),
    Some("LDC"),
    None, // LDC_W
    None, // LDC2_W
    Some("ILOAD"),
    Some("LLOAD"),
    Some("FLOAD"),
    Some("DLOAD"),
    Some("ALOAD"),
    None, // ILOAD_0 .. ALOAD_3
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    Some("IALOAD"),
    Some("LALOAD"),
    Some("FALOAD"),
    Some("DALOAD"),
    Some("AALOAD"),
    Some("BALOAD"),
    Some("CALOAD"),
    Some("SALOAD"),
    Some("ISTORE"),
    Some("LSTORE"),
    Some("FSTORE"),
    Some("DSTORE"),
    Some("ASTORE"),
    None, // ISTORE_0 .. ASTORE_3
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    Some("IASTORE"),
    Some("LASTORE"),
    Some("FASTORE"),
    Some("DASTORE"),
    Some("AASTORE"),
    Some("BASTORE"),
    Some("CASTORE"),
    Some("SASTORE"),
    Some("POP"),
    Some("POP2"),
    Some("DUP"),
    Some("DUP_X1"),
    Some("DUP_X2"),
    Some("DUP2"),
    Some("DUP2_X1"),
    Some("DUP2_X2"),
    Some("SWAP"),
    Some("IADD"),
    Some("LADD"),
    Some("FADD"),
    Some("DADD"),
    Some("ISUB"),
    Some("LSUB"),
    Some("FSUB"),
    Some("DSUB"),
    Some("IMUL"),
    Some("LMUL"),
    Some("FMUL"),
    Some("DMUL"),
    Some("IDIV"),
    Some("LDIV"),
    Some("FDIV"),
    Some("DDIV"),
    Some("IREM"),
    Some("LREM"),
    Some("FREM"),
    Some("DREM"),
    Some("INEG"),
    Some("LNEG"),
    Some("FNEG"),
    Some("DNEG"),
    Some("ISHL"),
    Some("LSHL"),
    Some("ISHR"),
    Some("LSHR"),
    Some("IUSHR"),
    Some("LUSHR"),
    Some("IAND"),
    Some("LAND"),
    Some("IOR"),
    Some("LOR"),
    Some("IXOR"),
    Some("LXOR"),
    Some("IINC"),
    Some("I2L"),
    Some("I2F"),
    Some("I2D"),
    Some("L2I"),
    Some("L2F"),
    Some("L2D"),
    Some("F2I"),
    Some("F2L"),
    Some("F2D"),
    Some("D2I"),
    Some("D2L"),
    Some("D2F"),
    Some("I2B"),
    Some("I2C"),
    Some("I2S"),
    Some("LCMP"),
    Some("FCMPL"),
    Some("FCMPG"),
    Some("DCMPL"),
    Some("DCMPG"),
    Some("IFEQ"),
    Some("IFNE"),
    Some("IFLT"),
    Some("IFGE"),
    Some("IFGT"),
    Some("IFLE"),
    Some("IF_ICMPEQ"),
    Some("IF_ICMPNE"),
    Some("IF_ICMPLT"),
    Some("IF_ICMPGE"),
    Some("IF_ICMPGT"),
    Some("IF_ICMPLE"),
    Some("IF_ACMPEQ"),
    Some("IF_ACMPNE"),
    Some("GOTO"),
    Some("JSR"),
    Some("RET"),
    Some("TABLESWITCH"),
    Some("LOOKUPSWITCH"),
    Some("IRETURN"),
    Some("LRETURN"),
    Some("FRETURN"),
    Some("DRETURN"),
    Some("ARETURN"),
    Some("RETURN"),
    Some("GETSTATIC"),
    Some("PUTSTATIC"),
    Some("GETFIELD"),
    Some("PUTFIELD"),
    Some("INVOKEVIRTUAL"),
    Some("INVOKESPECIAL"),
    Some("INVOKESTATIC"),
    Some("INVOKEINTERFACE"),
    Some("INVOKEDYNAMIC"),
    Some("NEW"),
    Some("NEWARRAY"),
    Some("ANEWARRAY"),
    Some("ARRAYLENGTH"),
    Some("ATHROW"),
    Some("CHECKCAST"),
    Some("INSTANCEOF"),
    Some("MONITORENTER"),
    Some("MONITOREXIT"),
    None, // WIDE
    Some("MULTIANEWARRAY"),
    Some("IFNULL"),
    Some("IFNONNULL"),
];

/// Mnemonic for an instruction code, if the slot is in use.
pub fn mnemonic(opcode: u8) -> Option<&'static str> {
    OPCODES.get(opcode as usize).copied().flatten()
}

/// Primitive array type codes for the `NEWARRAY` operand (4–11).
pub const T_BOOLEAN: i32 = 4;
pub const T_CHAR: i32 = 5;
pub const T_FLOAT: i32 = 6;
pub const T_DOUBLE: i32 = 7;
pub const T_BYTE: i32 = 8;
pub const T_SHORT: i32 = 9;
pub const T_INT: i32 = 10;
pub const T_LONG: i32 = 11;

/// Mnemonic for a primitive-array type code, `None` outside 4–11.
pub fn array_type(operand: i32) -> Option<&'static str> {
    match operand {
        T_BOOLEAN => Some("T_BOOLEAN"),
        T_CHAR => Some("T_CHAR"),
        T_FLOAT => Some("T_FLOAT"),
        T_DOUBLE => Some("T_DOUBLE"),
        T_BYTE => Some("T_BYTE"),
        T_SHORT => Some("T_SHORT"),
        T_INT => Some("T_INT"),
        T_LONG => Some("T_LONG"),
        _ => None,
    }
}

// One named constant per in-use instruction code. The generator-source
// output references these unconditionally, so the set must stay complete.
pub const NOP: u8 = 0;
pub const ACONST_NULL: u8 = 1;
pub const ICONST_M1: u8 = 2;
pub const ICONST_0: u8 = 3;
pub const ICONST_1: u8 = 4;
pub const ICONST_2: u8 = 5;
pub const ICONST_3: u8 = 6;
pub const ICONST_4: u8 = 7;
pub const ICONST_5: u8 = 8;
pub const LCONST_0: u8 = 9;
pub const LCONST_1: u8 = 10;
pub const FCONST_0: u8 = 11;
pub const FCONST_1: u8 = 12;
pub const FCONST_2: u8 = 13;
pub const DCONST_0: u8 = 14;
pub const DCONST_1: u8 = 15;
pub const BIPUSH: u8 = 16;
pub const SIPUSH: u8 = 17;
pub const LDC: u8 = 18;
pub const ILOAD: u8 = 21;
pub const LLOAD: u8 = 22;
pub const FLOAD: u8 = 23;
pub const DLOAD: u8 = 24;
pub const ALOAD: u8 = 25;
pub const IALOAD: u8 = 46;
pub const LALOAD: u8 = 47;
pub const FALOAD: u8 = 48;
pub const DALOAD: u8 = 49;
pub const AALOAD: u8 = 50;
pub const BALOAD: u8 = 51;
pub const CALOAD: u8 = 52;
pub const SALOAD: u8 = 53;
pub const ISTORE: u8 = 54;
pub const LSTORE: u8 = 55;
pub const FSTORE: u8 = 56;
pub const DSTORE: u8 = 57;
pub const ASTORE: u8 = 58;
pub const IASTORE: u8 = 79;
pub const LASTORE: u8 = 80;
pub const FASTORE: u8 = 81;
pub const DASTORE: u8 = 82;
pub const AASTORE: u8 = 83;
pub const BASTORE: u8 = 84;
pub const CASTORE: u8 = 85;
pub const SASTORE: u8 = 86;
pub const POP: u8 = 87;
pub const POP2: u8 = 88;
pub const DUP: u8 = 89;
pub const DUP_X1: u8 = 90;
pub const DUP_X2: u8 = 91;
pub const DUP2: u8 = 92;
pub const DUP2_X1: u8 = 93;
pub const DUP2_X2: u8 = 94;
pub const SWAP: u8 = 95;
pub const IADD: u8 = 96;
pub const LADD: u8 = 97;
pub const FADD: u8 = 98;
pub const DADD: u8 = 99;
pub const ISUB: u8 = 100;
pub const LSUB: u8 = 101;
pub const FSUB: u8 = 102;
pub const DSUB: u8 = 103;
pub const IMUL: u8 = 104;
pub const LMUL: u8 = 105;
pub const FMUL: u8 = 106;
pub const DMUL: u8 = 107;
pub const IDIV: u8 = 108;
pub const LDIV: u8 = 109;
pub const FDIV: u8 = 110;
pub const DDIV: u8 = 111;
pub const IREM: u8 = 112;
pub const LREM: u8 = 113;
pub const FREM: u8 = 114;
pub const DREM: u8 = 115;
pub const INEG: u8 = 116;
pub const LNEG: u8 = 117;
pub const FNEG: u8 = 118;
pub const DNEG: u8 = 119;
pub const ISHL: u8 = 120;
pub const LSHL: u8 = 121;
pub const ISHR: u8 = 122;
pub const LSHR: u8 = 123;
pub const IUSHR: u8 = 124;
pub const LUSHR: u8 = 125;
pub const IAND: u8 = 126;
pub const LAND: u8 = 127;
pub const IOR: u8 = 128;
pub const LOR: u8 = 129;
pub const IXOR: u8 = 130;
pub const LXOR: u8 = 131;
pub const IINC: u8 = 132;
pub const I2L: u8 = 133;
pub const I2F: u8 = 134;
pub const I2D: u8 = 135;
pub const L2I: u8 = 136;
pub const L2F: u8 = 137;
pub const L2D: u8 = 138;
pub const F2I: u8 = 139;
pub const F2L: u8 = 140;
pub const F2D: u8 = 141;
pub const D2I: u8 = 142;
pub const D2L: u8 = 143;
pub const D2F: u8 = 144;
pub const I2B: u8 = 145;
pub const I2C: u8 = 146;
pub const I2S: u8 = 147;
pub const LCMP: u8 = 148;
pub const FCMPL: u8 = 149;
pub const FCMPG: u8 = 150;
pub const DCMPL: u8 = 151;
pub const DCMPG: u8 = 152;
pub const IFEQ: u8 = 153;
pub const IFNE: u8 = 154;
pub const IFLT: u8 = 155;
pub const IFGE: u8 = 156;
pub const IFGT: u8 = 157;
pub const IFLE: u8 = 158;
pub const IF_ICMPEQ: u8 = 159;
pub const IF_ICMPNE: u8 = 160;
pub const IF_ICMPLT: u8 = 161;
pub const IF_ICMPGE: u8 = 162;
pub const IF_ICMPGT: u8 = 163;
pub const IF_ICMPLE: u8 = 164;
pub const IF_ACMPEQ: u8 = 165;
pub const IF_ACMPNE: u8 = 166;
pub const GOTO: u8 = 167;
pub const JSR: u8 = 168;
pub const RET: u8 = 169;
pub const TABLESWITCH: u8 = 170;
pub const LOOKUPSWITCH: u8 = 171;
pub const IRETURN: u8 = 172;
pub const LRETURN: u8 = 173;
pub const FRETURN: u8 = 174;
pub const DRETURN: u8 = 175;
pub const ARETURN: u8 = 176;
pub const RETURN: u8 = 177;
pub const GETSTATIC: u8 = 178;
pub const PUTSTATIC: u8 = 179;
pub const GETFIELD: u8 = 180;
pub const PUTFIELD: u8 = 181;
pub const INVOKEVIRTUAL: u8 = 182;
pub const INVOKESPECIAL: u8 = 183;
pub const INVOKESTATIC: u8 = 184;
pub const INVOKEINTERFACE: u8 = 185;
pub const INVOKEDYNAMIC: u8 = 186;
pub const NEW: u8 = 187;
pub const NEWARRAY: u8 = 188;
pub const ANEWARRAY: u8 = 189;
pub const ARRAYLENGTH: u8 = 190;
pub const ATHROW: u8 = 191;
pub const CHECKCAST: u8 = 192;
pub const INSTANCEOF: u8 = 193;
pub const MONITORENTER: u8 = 194;
pub const MONITOREXIT: u8 = 195;
pub const MULTIANEWARRAY: u8 = 197;
pub const IFNULL: u8 = 198;
pub const IFNONNULL: u8 = 199;

/// Which visit callback an instruction code may legally arrive through.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum OperandShape {
    /// No operands (`visit_insn`)
    Plain,
    /// One immediate integer (`visit_int_insn`)
    IntOperand,
    /// Local variable index (`visit_var_insn`)
    Var,
    /// Internal class name (`visit_type_insn`)
    Type,
    /// Field reference (`visit_field_insn`)
    Field,
    /// Method reference (`visit_method_insn`)
    Method,
    /// Dynamic call site (`visit_invoke_dynamic`)
    InvokeDynamic,
    /// Branch target label (`visit_jump_insn`)
    Jump,
    /// Loadable constant (`visit_ldc_insn`)
    Ldc,
    /// Variable index + increment (`visit_iinc_insn`)
    Iinc,
    /// Dense key range (`visit_table_switch`)
    TableSwitch,
    /// Sparse key list (`visit_lookup_switch`)
    LookupSwitch,
    /// Array descriptor + dimension count (`visit_multi_new_array`)
    MultiNewArray,
}

/// Operand shape of an instruction code, `None` for reserved slots.
pub fn shape(opcode: u8) -> Option<OperandShape> {
    use OperandShape::*;
    let shape = match opcode {
        0..=15 | 46..=53 | 79..=131 | 133..=152 | 172..=177 => Plain,
        190 | 191 | 194 | 195 => Plain,
        16 | 17 | 188 => IntOperand,
        21..=25 | 54..=58 | 169 => Var,
        187 | 189 | 192 | 193 => Type,
        178..=181 => Field,
        182..=185 => Method,
        186 => InvokeDynamic,
        153..=168 | 198 | 199 => Jump,
        18 => Ldc,
        132 => Iinc,
        170 => TableSwitch,
        171 => LookupSwitch,
        197 => MultiNewArray,
        _ => return None,
    };
    Some(shape)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn mnemonics_match_codes() {
        assert_eq!(mnemonic(0), Some("NOP"));
        assert_eq!(mnemonic(RETURN), Some("RETURN"));
        assert_eq!(mnemonic(GETSTATIC), Some("GETSTATIC"));
        assert_eq!(mnemonic(INVOKEVIRTUAL), Some("INVOKEVIRTUAL"));
        assert_eq!(mnemonic(IFNULL), Some("IFNULL"));
        assert_eq!(mnemonic(199), Some("IFNONNULL"));
    }

    #[test]
    fn table_stays_aligned_after_reserved_blocks() {
        // a miscounted reserved run would shift every later mnemonic
        assert_eq!(mnemonic(45), None);
        assert_eq!(mnemonic(IALOAD), Some("IALOAD"));
        assert_eq!(mnemonic(78), None);
        assert_eq!(mnemonic(IASTORE), Some("IASTORE"));
        assert_eq!(mnemonic(ARETURN), Some("ARETURN"));
        assert_eq!(mnemonic(MONITOREXIT), Some("MONITOREXIT"));
    }

    #[test]
    fn named_constants_match_the_table() {
        for (code, name) in [
            (ICONST_M1, "ICONST_M1"),
            (SALOAD, "SALOAD"),
            (DUP2_X1, "DUP2_X1"),
            (LSUB, "LSUB"),
            (LXOR, "LXOR"),
            (I2S, "I2S"),
            (FCMPG, "FCMPG"),
            (IF_ACMPNE, "IF_ACMPNE"),
            (JSR, "JSR"),
            (ARRAYLENGTH, "ARRAYLENGTH"),
            (INSTANCEOF, "INSTANCEOF"),
            (IFNONNULL, "IFNONNULL"),
        ] {
            assert_eq!(mnemonic(code), Some(name));
        }
    }

    #[test]
    fn reserved_slots_are_absent() {
        // wide forms and the fused load/store variants never show up as events
        assert_eq!(mnemonic(19), None);
        assert_eq!(mnemonic(20), None);
        assert_eq!(mnemonic(26), None);
        assert_eq!(mnemonic(78), None);
        assert_eq!(mnemonic(196), None);
    }

    #[test]
    fn array_type_codes() {
        assert_eq!(array_type(T_BOOLEAN), Some("T_BOOLEAN"));
        assert_eq!(array_type(T_LONG), Some("T_LONG"));
        assert_eq!(array_type(3), None);
        assert_eq!(array_type(12), None);
    }

    #[test]
    fn shapes_follow_dispatch() {
        assert_eq!(shape(RETURN), Some(OperandShape::Plain));
        assert_eq!(shape(BIPUSH), Some(OperandShape::IntOperand));
        assert_eq!(shape(ALOAD), Some(OperandShape::Var));
        assert_eq!(shape(NEW), Some(OperandShape::Type));
        assert_eq!(shape(GETFIELD), Some(OperandShape::Field));
        assert_eq!(shape(INVOKESPECIAL), Some(OperandShape::Method));
        assert_eq!(shape(GOTO), Some(OperandShape::Jump));
        assert_eq!(shape(169), Some(OperandShape::Var)); // RET
        assert_eq!(shape(196), None);
        assert_eq!(shape(20), None);
    }

    #[test]
    fn every_named_slot_has_a_shape() {
        for code in 0..200u8 {
            assert_eq!(
                OPCODES[code as usize].is_some(),
                shape(code).is_some(),
                "mismatch at opcode {}",
                code
            );
        }
    }
}
