//! Advance widths for the standard Helvetica faces.
//!
//! Values are the Adobe AFM widths in 1/1000 em, laid out by WinAnsiEncoding
//! byte so that measurement and serialization agree on every character.

/// Widths of the printable ASCII range 0x20..=0x7E, regular weight.
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // 0x20
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0x30
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // 0x40
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 0x50
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // 0x60
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 0x70
];

/// Widths of the printable ASCII range 0x20..=0x7E, bold weight.
const HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // 0x20
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 0x30
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // 0x40
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 0x50
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // 0x60
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 0x70
];

/// WinAnsi bytes above 0x7F: (code, regular width, bold width).
const WINANSI_HIGH: &[(u8, u16, u16)] = &[
    (0x80, 556, 556),  // Euro
    (0x82, 222, 278),  // quotesinglbase
    (0x83, 556, 556),  // florin
    (0x84, 333, 500),  // quotedblbase
    (0x85, 1000, 1000), // ellipsis
    (0x86, 556, 556),  // dagger
    (0x87, 556, 556),  // daggerdbl
    (0x88, 333, 333),  // circumflex
    (0x89, 1000, 1000), // perthousand
    (0x8A, 667, 667),  // Scaron
    (0x8B, 333, 333),  // guilsinglleft
    (0x8C, 1000, 1000), // OE
    (0x8E, 611, 611),  // Zcaron
    (0x91, 222, 278),  // quoteleft
    (0x92, 222, 278),  // quoteright
    (0x93, 333, 500),  // quotedblleft
    (0x94, 333, 500),  // quotedblright
    (0x95, 350, 350),  // bullet
    (0x96, 556, 556),  // endash
    (0x97, 1000, 1000), // emdash
    (0x98, 333, 333),  // tilde
    (0x99, 1000, 1000), // trademark
    (0x9A, 500, 556),  // scaron
    (0x9B, 333, 333),  // guilsinglright
    (0x9C, 944, 944),  // oe
    (0x9E, 500, 500),  // zcaron
    (0x9F, 667, 667),  // Ydieresis
    (0xA0, 278, 278),  // nbspace
    (0xA1, 333, 333),
    (0xA2, 556, 556),
    (0xA3, 556, 556),
    (0xA4, 556, 556),
    (0xA5, 556, 556),
    (0xA6, 260, 280),
    (0xA7, 556, 556),
    (0xA8, 333, 333),
    (0xA9, 737, 737),
    (0xAA, 370, 370),
    (0xAB, 556, 556),
    (0xAC, 584, 584),
    (0xAD, 333, 333),
    (0xAE, 737, 737),
    (0xAF, 333, 333),
    (0xB0, 400, 400),
    (0xB1, 584, 584),
    (0xB2, 333, 333),
    (0xB3, 333, 333),
    (0xB4, 333, 333),
    (0xB5, 556, 611),
    (0xB6, 537, 556),
    (0xB7, 278, 278),
    (0xB8, 333, 333),
    (0xB9, 333, 333),
    (0xBA, 365, 365),
    (0xBB, 556, 556),
    (0xBC, 834, 834),
    (0xBD, 834, 834),
    (0xBE, 834, 834),
    (0xBF, 611, 611),
];

/// Width of the Latin-1 letters 0xC0..=0xFF: (regular, bold).
const LATIN1_LETTERS: [(u16, u16); 64] = [
    (667, 722), (667, 722), (667, 722), (667, 722), (667, 722), (667, 722), (1000, 1000), (722, 722),
    (667, 667), (667, 667), (667, 667), (667, 667), (278, 278), (278, 278), (278, 278), (278, 278),
    (722, 722), (722, 722), (778, 778), (778, 778), (778, 778), (778, 778), (778, 778), (584, 584),
    (778, 778), (722, 722), (722, 722), (722, 722), (722, 722), (667, 667), (667, 667), (611, 611),
    (556, 556), (556, 556), (556, 556), (556, 556), (556, 556), (556, 556), (889, 889), (500, 556),
    (556, 556), (556, 556), (556, 556), (556, 556), (278, 278), (278, 278), (278, 278), (278, 278),
    (556, 611), (556, 611), (556, 611), (556, 611), (556, 611), (556, 611), (556, 611), (584, 584),
    (611, 611), (556, 611), (556, 611), (556, 611), (556, 611), (500, 556), (556, 611), (500, 556),
];

/// Per-byte advance widths for one standard font.
#[derive(Debug, Clone)]
pub struct StandardFontMetrics {
    widths: [u16; 256],
}

impl StandardFontMetrics {
    pub fn helvetica() -> Self {
        Self::build(false)
    }

    pub fn helvetica_bold() -> Self {
        Self::build(true)
    }

    fn build(bold: bool) -> Self {
        // Anything unmapped measures like '?', which is what gets drawn.
        let question = if bold { 611 } else { 556 };
        let mut widths = [question; 256];

        let ascii = if bold {
            &HELVETICA_BOLD_ASCII
        } else {
            &HELVETICA_ASCII
        };
        for (i, &w) in ascii.iter().enumerate() {
            widths[0x20 + i] = w;
        }
        for &(code, regular, heavy) in WINANSI_HIGH {
            widths[code as usize] = if bold { heavy } else { regular };
        }
        for (i, &(regular, heavy)) in LATIN1_LETTERS.iter().enumerate() {
            widths[0xC0 + i] = if bold { heavy } else { regular };
        }

        Self { widths }
    }

    /// Advance width of an encoded byte in 1/1000 em.
    pub fn byte_units(&self, byte: u8) -> u32 {
        u32::from(self.widths[byte as usize])
    }
}
