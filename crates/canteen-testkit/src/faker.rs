// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use canteen_app::CompanyType;

const COMPANY_PREFIXES: [&str; 12] = [
    "Northwind",
    "Bluebird",
    "Summit",
    "Harbor",
    "Maple",
    "Granite",
    "Lakeside",
    "Copper",
    "Evergreen",
    "Meridian",
    "Riverbend",
    "Sunrise",
];

const COMPANY_SUFFIXES: [&str; 8] = [
    "Labs",
    "Logistics",
    "Partners",
    "Systems",
    "Works",
    "Health",
    "Studios",
    "Group",
];

const DISHES: [(&str, &str); 20] = [
    ("Tomato Soup", "Roasted tomatoes, basil"),
    ("Chicken Curry", "Mild curry with basmati rice"),
    ("Caesar Salad", "Romaine, parmesan, croutons"),
    ("Veggie Lasagna", "Spinach, ricotta, marinara"),
    ("Beef Tacos", "Corn tortillas, salsa verde"),
    ("Falafel Wrap", "Hummus, pickled onions"),
    ("Mushroom Risotto", "Arborio rice, thyme"),
    ("Grilled Salmon", "Lemon butter, green beans"),
    ("Pad Thai", "Rice noodles, peanuts, lime"),
    ("Lentil Stew", "Carrots, cumin, coriander"),
    ("Margherita Pizza", "Mozzarella, basil"),
    ("Bibimbap", "Rice bowl, egg, gochujang"),
    ("Greek Salad", "Feta, olives, cucumber"),
    ("Pulled Pork", "Brioche bun, coleslaw"),
    ("Minestrone", "Seasonal vegetables, pasta"),
    ("Chili Con Carne", "Kidney beans, sour cream"),
    ("Shakshuka", "Eggs poached in tomato sauce"),
    ("Teriyaki Tofu", "Sesame, scallions, rice"),
    ("Fish and Chips", "Tartar sauce, mushy peas"),
    ("Apple Crumble", "Oat topping, custard"),
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeCompany {
    pub name: String,
    pub company_type: CompanyType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeDish {
    pub name: String,
    pub description: String,
}

/// Seeded generator for demo companies, dishes, and scores. The same seed
/// always yields the same sequence.
#[derive(Debug, Clone)]
pub struct MenuFaker {
    rng: DeterministicRng,
}

impl MenuFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn company(&mut self) -> FakeCompany {
        let prefix = COMPANY_PREFIXES[self.rng.int_n(COMPANY_PREFIXES.len())];
        let suffix = COMPANY_SUFFIXES[self.rng.int_n(COMPANY_SUFFIXES.len())];
        let company_type = CompanyType::ALL[self.rng.int_n(CompanyType::ALL.len())];
        FakeCompany {
            name: format!("{prefix} {suffix}"),
            company_type,
        }
    }

    /// Distinct dishes, at most the size of the built-in catalogue.
    pub fn dishes(&mut self, count: usize) -> Vec<FakeDish> {
        let mut pool: Vec<usize> = (0..DISHES.len()).collect();
        let mut picked = Vec::with_capacity(count.min(pool.len()));
        while picked.len() < count && !pool.is_empty() {
            let (name, description) = DISHES[pool.swap_remove(self.rng.int_n(pool.len()))];
            picked.push(FakeDish {
                name: name.to_owned(),
                description: description.to_owned(),
            });
        }
        picked
    }

    /// A score on the 1..=5 scale, skewed toward the upper half.
    pub fn score(&mut self) -> u8 {
        const WEIGHTED: [u8; 10] = [1, 2, 3, 3, 4, 4, 4, 5, 5, 5];
        WEIGHTED[self.rng.int_n(WEIGHTED.len())]
    }
}
