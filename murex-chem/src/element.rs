//! Periodic table data and element lookup.

/// A chemical element from the periodic table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    pub atomic_number: u8,
    pub symbol: &'static str,
    pub name: &'static str,
    pub valence: u8,
}

/// Elements 1–54 (H through Xe).
static ELEMENTS: [Element; 54] = [
    Element { atomic_number: 1, symbol: "H", name: "Hydrogen", valence: 1 },
    Element { atomic_number: 2, symbol: "He", name: "Helium", valence: 0 },
    Element { atomic_number: 3, symbol: "Li", name: "Lithium", valence: 1 },
    Element { atomic_number: 4, symbol: "Be", name: "Beryllium", valence: 2 },
    Element { atomic_number: 5, symbol: "B", name: "Boron", valence: 3 },
    Element { atomic_number: 6, symbol: "C", name: "Carbon", valence: 4 },
    Element { atomic_number: 7, symbol: "N", name: "Nitrogen", valence: 3 },
    Element { atomic_number: 8, symbol: "O", name: "Oxygen", valence: 2 },
    Element { atomic_number: 9, symbol: "F", name: "Fluorine", valence: 1 },
    Element { atomic_number: 10, symbol: "Ne", name: "Neon", valence: 0 },
    Element { atomic_number: 11, symbol: "Na", name: "Sodium", valence: 1 },
    Element { atomic_number: 12, symbol: "Mg", name: "Magnesium", valence: 2 },
    Element { atomic_number: 13, symbol: "Al", name: "Aluminum", valence: 3 },
    Element { atomic_number: 14, symbol: "Si", name: "Silicon", valence: 4 },
    Element { atomic_number: 15, symbol: "P", name: "Phosphorus", valence: 3 },
    Element { atomic_number: 16, symbol: "S", name: "Sulfur", valence: 2 },
    Element { atomic_number: 17, symbol: "Cl", name: "Chlorine", valence: 1 },
    Element { atomic_number: 18, symbol: "Ar", name: "Argon", valence: 0 },
    Element { atomic_number: 19, symbol: "K", name: "Potassium", valence: 1 },
    Element { atomic_number: 20, symbol: "Ca", name: "Calcium", valence: 2 },
    Element { atomic_number: 21, symbol: "Sc", name: "Scandium", valence: 3 },
    Element { atomic_number: 22, symbol: "Ti", name: "Titanium", valence: 4 },
    Element { atomic_number: 23, symbol: "V", name: "Vanadium", valence: 5 },
    Element { atomic_number: 24, symbol: "Cr", name: "Chromium", valence: 3 },
    Element { atomic_number: 25, symbol: "Mn", name: "Manganese", valence: 2 },
    Element { atomic_number: 26, symbol: "Fe", name: "Iron", valence: 3 },
    Element { atomic_number: 27, symbol: "Co", name: "Cobalt", valence: 3 },
    Element { atomic_number: 28, symbol: "Ni", name: "Nickel", valence: 2 },
    Element { atomic_number: 29, symbol: "Cu", name: "Copper", valence: 2 },
    Element { atomic_number: 30, symbol: "Zn", name: "Zinc", valence: 2 },
    Element { atomic_number: 31, symbol: "Ga", name: "Gallium", valence: 3 },
    Element { atomic_number: 32, symbol: "Ge", name: "Germanium", valence: 4 },
    Element { atomic_number: 33, symbol: "As", name: "Arsenic", valence: 3 },
    Element { atomic_number: 34, symbol: "Se", name: "Selenium", valence: 2 },
    Element { atomic_number: 35, symbol: "Br", name: "Bromine", valence: 1 },
    Element { atomic_number: 36, symbol: "Kr", name: "Krypton", valence: 0 },
    Element { atomic_number: 37, symbol: "Rb", name: "Rubidium", valence: 1 },
    Element { atomic_number: 38, symbol: "Sr", name: "Strontium", valence: 2 },
    Element { atomic_number: 39, symbol: "Y", name: "Yttrium", valence: 3 },
    Element { atomic_number: 40, symbol: "Zr", name: "Zirconium", valence: 4 },
    Element { atomic_number: 41, symbol: "Nb", name: "Niobium", valence: 5 },
    Element { atomic_number: 42, symbol: "Mo", name: "Molybdenum", valence: 6 },
    Element { atomic_number: 43, symbol: "Tc", name: "Technetium", valence: 7 },
    Element { atomic_number: 44, symbol: "Ru", name: "Ruthenium", valence: 4 },
    Element { atomic_number: 45, symbol: "Rh", name: "Rhodium", valence: 3 },
    Element { atomic_number: 46, symbol: "Pd", name: "Palladium", valence: 2 },
    Element { atomic_number: 47, symbol: "Ag", name: "Silver", valence: 1 },
    Element { atomic_number: 48, symbol: "Cd", name: "Cadmium", valence: 2 },
    Element { atomic_number: 49, symbol: "In", name: "Indium", valence: 3 },
    Element { atomic_number: 50, symbol: "Sn", name: "Tin", valence: 4 },
    Element { atomic_number: 51, symbol: "Sb", name: "Antimony", valence: 3 },
    Element { atomic_number: 52, symbol: "Te", name: "Tellurium", valence: 2 },
    Element { atomic_number: 53, symbol: "I", name: "Iodine", valence: 1 },
    Element { atomic_number: 54, symbol: "Xe", name: "Xenon", valence: 0 },
];

/// Look up an element by its symbol (e.g. "C", "Fe").
pub fn element_by_symbol(symbol: &str) -> Option<&'static Element> {
    ELEMENTS.iter().find(|e| e.symbol == symbol)
}

/// Look up an element by its atomic number (1-based).
pub fn element_by_number(n: u8) -> Option<&'static Element> {
    if n >= 1 && n <= 54 {
        Some(&ELEMENTS[(n - 1) as usize])
    } else {
        None
    }
}
