use lazy_static::lazy_static;
use std::collections::HashMap;

/// Chemical element with its standard atomic mass in dalton.
#[derive(Debug, PartialEq)]
pub struct Element {
    pub atomic_number: u8,
    pub symbol: &'static str,
    pub mass: f64,
}

static ELEMENTS: &[Element] = &[
    Element { atomic_number: 1, symbol: "H", mass: 1.008 },
    Element { atomic_number: 3, symbol: "Li", mass: 6.94 },
    Element { atomic_number: 6, symbol: "C", mass: 12.011 },
    Element { atomic_number: 7, symbol: "N", mass: 14.007 },
    Element { atomic_number: 8, symbol: "O", mass: 15.999 },
    Element { atomic_number: 9, symbol: "F", mass: 18.998 },
    Element { atomic_number: 11, symbol: "Na", mass: 22.990 },
    Element { atomic_number: 12, symbol: "Mg", mass: 24.305 },
    Element { atomic_number: 15, symbol: "P", mass: 30.974 },
    Element { atomic_number: 16, symbol: "S", mass: 32.06 },
    Element { atomic_number: 17, symbol: "Cl", mass: 35.45 },
    Element { atomic_number: 19, symbol: "K", mass: 39.098 },
    Element { atomic_number: 20, symbol: "Ca", mass: 40.078 },
    Element { atomic_number: 25, symbol: "Mn", mass: 54.938 },
    Element { atomic_number: 26, symbol: "Fe", mass: 55.845 },
    Element { atomic_number: 29, symbol: "Cu", mass: 63.546 },
    Element { atomic_number: 30, symbol: "Zn", mass: 65.38 },
    Element { atomic_number: 34, symbol: "Se", mass: 78.971 },
    Element { atomic_number: 35, symbol: "Br", mass: 79.904 },
    Element { atomic_number: 37, symbol: "Rb", mass: 85.468 },
    Element { atomic_number: 53, symbol: "I", mass: 126.904 },
    Element { atomic_number: 55, symbol: "Cs", mass: 132.905 },
];

lazy_static! {
    static ref BY_NUMBER: HashMap<u8, &'static Element> = ELEMENTS
        .iter()
        .map(|element| (element.atomic_number, element))
        .collect();
}

impl Element {
    pub fn by_atomic_number(atomic_number: u8) -> Option<&'static Element> {
        BY_NUMBER.get(&atomic_number).copied()
    }

    /// Closest element by mass. Massless particles (extra points) have no element,
    /// and anything lighter than 3.5 Da is taken to be hydrogen so that
    /// repartitioned hydrogen masses still resolve.
    pub fn guess_from_mass(mass: f64) -> Option<&'static Element> {
        if mass < 0.5 {
            return None;
        }
        if mass < 3.5 {
            return Element::by_atomic_number(1);
        }
        ELEMENTS.iter().min_by(|a, b| {
            (a.mass - mass)
                .abs()
                .total_cmp(&(b.mass - mass).abs())
        })
    }

    pub fn is_hydrogen(&self) -> bool {
        self.atomic_number == 1
    }
}
