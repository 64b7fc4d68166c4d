use crate::types::Token;

/// How a search term is matched against a token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// Term contained in symbol, name, or address.
    #[default]
    Substring,
    /// Symbol or decimal chain id starts with the term.
    Prefix,
}

impl std::str::FromStr for MatchMode {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "substring" | "contains" => Ok(MatchMode::Substring),
            "prefix" | "starts-with" => Ok(MatchMode::Prefix),
            _ => Err(anyhow::anyhow!(
                "Invalid match mode '{s}'. Valid options: substring, prefix"
            )),
        }
    }
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchMode::Substring => write!(f, "substring"),
            MatchMode::Prefix => write!(f, "prefix"),
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct CompiledFilter {
    pub needle: String,
    pub mode: MatchMode,
}

pub fn compile_filter(term: &str, mode: MatchMode) -> CompiledFilter {
    CompiledFilter {
        needle: term.trim().to_lowercase(),
        mode,
    }
}

pub fn is_empty(f: &CompiledFilter) -> bool {
    f.needle.is_empty()
}

pub fn token_matches(token: &Token, f: &CompiledFilter) -> bool {
    if is_empty(f) {
        return true;
    }

    let needle = f.needle.as_str();
    match f.mode {
        MatchMode::Substring => {
            token.symbol.to_lowercase().contains(needle)
                || token.name.to_lowercase().contains(needle)
                || token.address.to_lowercase().contains(needle)
        }
        MatchMode::Prefix => {
            token.symbol.to_lowercase().starts_with(needle)
                || token.chain_id.to_string().starts_with(needle)
        }
    }
}

/// Indices of matching tokens, in source order.
pub fn filter_indices(tokens: &[Token], f: &CompiledFilter) -> Vec<usize> {
    if is_empty(f) {
        return (0..tokens.len()).collect();
    }
    tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| token_matches(t, f))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(symbol: &str, name: &str, address: &str, chain_id: u64) -> Token {
        Token {
            symbol: symbol.into(),
            name: name.into(),
            address: address.into(),
            decimals: 18,
            chain_id,
            logo_uri: None,
            coingecko_id: None,
            listed_in: vec![],
        }
    }

    fn sample() -> Vec<Token> {
        vec![
            tok("USDC", "USD Coin", "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", 1),
            tok("WETH", "Wrapped Ether", "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2", 1),
            tok("ARB", "Arbitrum", "0x912CE59144191C1204E64559FE8253a0e49E6548", 42161),
            tok("DAI", "Dai Stablecoin", "0x6B175474E89094C44Da98b954EedeAC495271d0F", 1),
        ]
    }

    #[test]
    fn empty_term_keeps_everything_in_order() {
        let tokens = sample();
        for term in ["", "   "] {
            let f = compile_filter(term, MatchMode::Substring);
            assert_eq!(filter_indices(&tokens, &f), vec![0, 1, 2, 3]);
        }
    }

    #[test]
    fn substring_matches_symbol_name_or_address() {
        let tokens = sample();
        let f = compile_filter("usd", MatchMode::Substring);
        assert_eq!(filter_indices(&tokens, &f), vec![0]);

        let f = compile_filter("ether", MatchMode::Substring);
        assert_eq!(filter_indices(&tokens, &f), vec![1]);

        // Address fragment, different case
        let f = compile_filter("6b1754", MatchMode::Substring);
        assert_eq!(filter_indices(&tokens, &f), vec![3]);
    }

    #[test]
    fn substring_ignores_chain_id() {
        let tokens = sample();
        let f = compile_filter("42161", MatchMode::Substring);
        assert!(filter_indices(&tokens, &f).is_empty());
    }

    #[test]
    fn prefix_matches_symbol_start_or_chain_id() {
        let tokens = sample();
        let f = compile_filter("d", MatchMode::Prefix);
        assert_eq!(filter_indices(&tokens, &f), vec![3]);

        // "coin" appears in a name but prefix mode only looks at symbols
        let f = compile_filter("coin", MatchMode::Prefix);
        assert!(filter_indices(&tokens, &f).is_empty());

        let f = compile_filter("4216", MatchMode::Prefix);
        assert_eq!(filter_indices(&tokens, &f), vec![2]);
    }

    #[test]
    fn every_hit_contains_the_term() {
        let tokens = sample();
        for term in ["a", "0x", "E", "st", "zzz"] {
            let f = compile_filter(term, MatchMode::Substring);
            let needle = term.to_lowercase();
            for i in filter_indices(&tokens, &f) {
                let t = &tokens[i];
                assert!(
                    t.symbol.to_lowercase().contains(&needle)
                        || t.name.to_lowercase().contains(&needle)
                        || t.address.to_lowercase().contains(&needle),
                    "{} should not match {term}",
                    t.symbol
                );
            }
        }
    }

    #[test]
    fn parse_match_mode() {
        assert_eq!("PREFIX".parse::<MatchMode>().unwrap(), MatchMode::Prefix);
        assert_eq!("contains".parse::<MatchMode>().unwrap(), MatchMode::Substring);
        assert!("fuzzy".parse::<MatchMode>().is_err());
    }
}
