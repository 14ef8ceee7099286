/// Entry in the country filter. The empty code is the global board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Country {
    pub code: &'static str,
    pub name: &'static str,
}

pub const GLOBAL: Country = Country { code: "", name: "Global" };

pub const COUNTRIES: [Country; 11] = [
    GLOBAL,
    Country { code: "US", name: "United States" },
    Country { code: "GB", name: "United Kingdom" },
    Country { code: "CA", name: "Canada" },
    Country { code: "AU", name: "Australia" },
    Country { code: "DE", name: "Germany" },
    Country { code: "FR", name: "France" },
    Country { code: "JP", name: "Japan" },
    Country { code: "KR", name: "South Korea" },
    Country { code: "BR", name: "Brazil" },
    Country { code: "IN", name: "India" },
];

/// Finds a filter entry by code, case-insensitively.
pub fn lookup(code: &str) -> Option<Country> {
    let code = code.trim();
    COUNTRIES
        .iter()
        .copied()
        .find(|c| c.code.eq_ignore_ascii_case(code))
}

/// Resolves user input (`global`, a code, or a country name) to a filter entry.
pub fn resolve(input: &str) -> Option<Country> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("global") || input.eq_ignore_ascii_case("all") {
        return Some(GLOBAL);
    }
    lookup(input).or_else(|| {
        COUNTRIES
            .iter()
            .copied()
            .find(|c| c.name.eq_ignore_ascii_case(input))
    })
}

pub fn display_name(code: &str) -> &'static str {
    lookup(code).map(|c| c.name).unwrap_or("Unknown")
}
