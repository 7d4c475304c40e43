use phf::{Map, phf_map};

pub const HYDROGEN: u8 = 1;

static ATOMIC_NUMBERS: Map<&'static str, u8> = phf_map! {
    "H" => 1, "D" => 1, "He" => 2,
    "B" => 5, "C" => 6, "N" => 7, "O" => 8, "F" => 9, "Ne" => 10,
    "Na" => 11, "Mg" => 12, "Al" => 13, "Si" => 14, "P" => 15, "S" => 16,
    "Cl" => 17, "Ar" => 18, "K" => 19, "Ca" => 20,
    "Fe" => 26, "Cu" => 29, "Zn" => 30, "Se" => 34, "Br" => 35, "I" => 53,
};

pub fn atomic_number(symbol: &str) -> Option<u8> {
    ATOMIC_NUMBERS.get(symbol.trim()).copied()
}

pub fn is_hydrogen(atomic_number: u8) -> bool {
    atomic_number == HYDROGEN
}
