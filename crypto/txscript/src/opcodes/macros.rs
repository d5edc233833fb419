macro_rules! opcode_length {
    (u8) => {
        OpLength::Prefixed(1)
    };
    (u16) => {
        OpLength::Prefixed(2)
    };
    (u32) => {
        OpLength::Prefixed(4)
    };
    ($length: literal) => {
        OpLength::Fixed($length)
    };
}

macro_rules! opcode_list {
    ( $( opcode $(|$alias:ident|)? $name:ident<$num:literal, $length:tt> $text:literal )* ) => {
        pub mod codes {
            $(
                #[allow(non_upper_case_globals)]
                #[allow(dead_code)]
                pub const $name: u8 = $num;
                $(
                    #[allow(non_upper_case_globals)]
                    #[allow(dead_code)]
                    pub const $alias: u8 = $num;
                )?
            )*
        }

        /// Returns the assembly name of `opcode`, or `OP_UNKNOWN` for unassigned values.
        pub fn opcode_to_str(opcode: u8) -> &'static str {
            match opcode {
                $(
                    $num => $text,
                )*
                #[allow(unreachable_patterns)]
                _ => "OP_UNKNOWN",
            }
        }

        /// Encoded length of `opcode`. Unassigned values are single byte operations.
        pub fn opcode_length(opcode: u8) -> OpLength {
            match opcode {
                $(
                    $num => opcode_length!($length),
                )*
                #[allow(unreachable_patterns)]
                _ => OpLength::Fixed(1),
            }
        }
    };
}
