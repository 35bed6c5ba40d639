use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Brl,
    Usd,
    Eur,
}

impl Currency {
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Brl => "R$",
            Currency::Usd => "US$",
            Currency::Eur => "€",
        }
    }

    /// Two decimals, thousands grouped with commas: `R$ 1,234.50`.
    pub fn format(&self, amount: f64) -> String {
        format!("{} {}", self.symbol(), group_thousands(amount, 2))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[default]
    Mm,
    Cm,
    M,
}

impl LengthUnit {
    pub fn from_mm(&self, value_mm: f64) -> f64 {
        match self {
            LengthUnit::Mm => value_mm,
            LengthUnit::Cm => value_mm / 10.0,
            LengthUnit::M => value_mm / 1000.0,
        }
    }

    pub fn format(&self, value_mm: f64) -> String {
        let decimals = match self {
            LengthUnit::Mm => 1,
            LengthUnit::Cm => 1,
            LengthUnit::M => 3,
        };
        format!("{:.*}{}", decimals, self.from_mm(value_mm), self)
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LengthUnit::Mm => "mm",
            LengthUnit::Cm => "cm",
            LengthUnit::M => "m",
        };
        f.write_str(s)
    }
}

fn group_thousands(amount: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, amount.abs());
    let (int_part, frac_part) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };

    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

/// File-name friendly form of a project name: `Estante de Livros` -> `estante_de_livros`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_sep = true;
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
            last_was_sep = false;
        } else if !last_was_sep {
            slug.push('_');
            last_was_sep = true;
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    if slug.is_empty() {
        "project".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_format() {
        assert_eq!(Currency::Brl.format(1234.5), "R$ 1,234.50");
        assert_eq!(Currency::Usd.format(0.0), "US$ 0.00");
        assert_eq!(Currency::Eur.format(-1500000.0), "€ -1,500,000.00");
    }

    #[test]
    fn test_length_unit() {
        assert_eq!(LengthUnit::Mm.format(600.0), "600.0mm");
        assert_eq!(LengthUnit::Cm.format(600.0), "60.0cm");
        assert_eq!(LengthUnit::M.format(2750.0), "2.750m");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Estante de Livros"), "estante_de_livros");
        assert_eq!(slugify("  Cozinha #2 "), "cozinha_2");
        assert_eq!(slugify("***"), "project");
    }
}
