//! Element reference data
//!
//! Builds a [`SymbolTable`] either from the built-in periodic table or from a
//! comma-separated file with one `number,symbol,name` record per line. Only
//! the symbol (second field) is required; the name is kept for display.

use crate::parser::symbols::SymbolTable;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading an element table
#[derive(Debug, Error)]
pub enum TableError {
    #[error("could not read element table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("line {line}: record has no symbol field")]
    MissingSymbol { line: usize },
    #[error("line {line}: '{symbol}' is not a valid element symbol")]
    InvalidSymbol { line: usize, symbol: String },
}

/// `(symbol, name)` for elements 1 to 118.
const PERIODIC_TABLE: [(&str, &str); 118] = [
    ("H", "Hydrogen"),
    ("He", "Helium"),
    ("Li", "Lithium"),
    ("Be", "Beryllium"),
    ("B", "Boron"),
    ("C", "Carbon"),
    ("N", "Nitrogen"),
    ("O", "Oxygen"),
    ("F", "Fluorine"),
    ("Ne", "Neon"),
    ("Na", "Sodium"),
    ("Mg", "Magnesium"),
    ("Al", "Aluminium"),
    ("Si", "Silicon"),
    ("P", "Phosphorus"),
    ("S", "Sulfur"),
    ("Cl", "Chlorine"),
    ("Ar", "Argon"),
    ("K", "Potassium"),
    ("Ca", "Calcium"),
    ("Sc", "Scandium"),
    ("Ti", "Titanium"),
    ("V", "Vanadium"),
    ("Cr", "Chromium"),
    ("Mn", "Manganese"),
    ("Fe", "Iron"),
    ("Co", "Cobalt"),
    ("Ni", "Nickel"),
    ("Cu", "Copper"),
    ("Zn", "Zinc"),
    ("Ga", "Gallium"),
    ("Ge", "Germanium"),
    ("As", "Arsenic"),
    ("Se", "Selenium"),
    ("Br", "Bromine"),
    ("Kr", "Krypton"),
    ("Rb", "Rubidium"),
    ("Sr", "Strontium"),
    ("Y", "Yttrium"),
    ("Zr", "Zirconium"),
    ("Nb", "Niobium"),
    ("Mo", "Molybdenum"),
    ("Tc", "Technetium"),
    ("Ru", "Ruthenium"),
    ("Rh", "Rhodium"),
    ("Pd", "Palladium"),
    ("Ag", "Silver"),
    ("Cd", "Cadmium"),
    ("In", "Indium"),
    ("Sn", "Tin"),
    ("Sb", "Antimony"),
    ("Te", "Tellurium"),
    ("I", "Iodine"),
    ("Xe", "Xenon"),
    ("Cs", "Caesium"),
    ("Ba", "Barium"),
    ("La", "Lanthanum"),
    ("Ce", "Cerium"),
    ("Pr", "Praseodymium"),
    ("Nd", "Neodymium"),
    ("Pm", "Promethium"),
    ("Sm", "Samarium"),
    ("Eu", "Europium"),
    ("Gd", "Gadolinium"),
    ("Tb", "Terbium"),
    ("Dy", "Dysprosium"),
    ("Ho", "Holmium"),
    ("Er", "Erbium"),
    ("Tm", "Thulium"),
    ("Yb", "Ytterbium"),
    ("Lu", "Lutetium"),
    ("Hf", "Hafnium"),
    ("Ta", "Tantalum"),
    ("W", "Tungsten"),
    ("Re", "Rhenium"),
    ("Os", "Osmium"),
    ("Ir", "Iridium"),
    ("Pt", "Platinum"),
    ("Au", "Gold"),
    ("Hg", "Mercury"),
    ("Tl", "Thallium"),
    ("Pb", "Lead"),
    ("Bi", "Bismuth"),
    ("Po", "Polonium"),
    ("At", "Astatine"),
    ("Rn", "Radon"),
    ("Fr", "Francium"),
    ("Ra", "Radium"),
    ("Ac", "Actinium"),
    ("Th", "Thorium"),
    ("Pa", "Protactinium"),
    ("U", "Uranium"),
    ("Np", "Neptunium"),
    ("Pu", "Plutonium"),
    ("Am", "Americium"),
    ("Cm", "Curium"),
    ("Bk", "Berkelium"),
    ("Cf", "Californium"),
    ("Es", "Einsteinium"),
    ("Fm", "Fermium"),
    ("Md", "Mendelevium"),
    ("No", "Nobelium"),
    ("Lr", "Lawrencium"),
    ("Rf", "Rutherfordium"),
    ("Db", "Dubnium"),
    ("Sg", "Seaborgium"),
    ("Bh", "Bohrium"),
    ("Hs", "Hassium"),
    ("Mt", "Meitnerium"),
    ("Ds", "Darmstadtium"),
    ("Rg", "Roentgenium"),
    ("Cn", "Copernicium"),
    ("Nh", "Nihonium"),
    ("Fl", "Flerovium"),
    ("Mc", "Moscovium"),
    ("Lv", "Livermorium"),
    ("Ts", "Tennessine"),
    ("Og", "Oganesson"),
];

/// The built-in table of all 118 elements.
pub fn periodic_table() -> SymbolTable {
    let mut table = SymbolTable::new();
    for (symbol, name) in PERIODIC_TABLE {
        table.insert(symbol, Some(name.to_string()));
    }
    table
}

/// Read an element table from a file.
pub fn load(path: impl AsRef<Path>) -> Result<SymbolTable, TableError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| TableError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_table(&text)
}

/// Parse comma-separated element records.
///
/// Blank lines and `#` comments are skipped, as is a first record whose first
/// field is not a number (a header).
pub fn parse_table(text: &str) -> Result<SymbolTable, TableError> {
    let mut table = SymbolTable::new();
    let mut seen_record = false;

    for (index, record) in text.lines().enumerate() {
        let line = index + 1;
        let record = record.trim();
        if record.is_empty() || record.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = record.split(',').map(str::trim).collect();
        let is_header = !seen_record && fields[0].parse::<u32>().is_err();
        seen_record = true;
        if is_header {
            continue;
        }

        let symbol = match fields.get(1) {
            Some(symbol) if !symbol.is_empty() => *symbol,
            _ => return Err(TableError::MissingSymbol { line }),
        };
        if !is_valid_symbol(symbol) {
            return Err(TableError::InvalidSymbol {
                line,
                symbol: symbol.to_string(),
            });
        }

        let name = fields
            .get(2)
            .filter(|name| !name.is_empty())
            .map(|name| name.to_string());
        table.insert(symbol, name);
    }

    Ok(table)
}

/// One uppercase letter, optionally followed by one lowercase letter
fn is_valid_symbol(symbol: &str) -> bool {
    let mut chars = symbol.chars();
    let first_ok = chars.next().is_some_and(|c| c.is_ascii_uppercase());
    let rest: Vec<char> = chars.collect();
    first_ok && rest.len() <= 1 && rest.iter().all(|c| c.is_ascii_lowercase())
}
