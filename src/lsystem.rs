//////////////////////////////////////////////////////////////////////
// string rewriting: an axiom plus single-symbol productions,
// expanded one generation at a time

use std::collections::HashMap;
use std::iter::FromIterator;

//////////////////////////////////////////////////////////////////////
// productions keyed by the symbol they replace. symbols without a
// production rewrite to themselves.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    rules: HashMap<char, String>
}

impl RuleSet {

    pub fn new() -> Self {
        Default::default()
    }

    pub fn from_pairs<S: AsRef<str>>(pairs: &[(char, S)]) -> Self {
        pairs.iter().map(|(c, s)| (*c, s.as_ref())).collect()
    }

    // builder-style insert
    pub fn with_rule(mut self, symbol: char, replacement: &str) -> Self {
        self.insert(symbol, replacement);
        self
    }

    // returns the replacement previously stored for symbol, if any
    pub fn insert(&mut self, symbol: char, replacement: &str) -> Option<String> {
        self.rules.insert(symbol, replacement.to_string())
    }

    pub fn get(&self, symbol: char) -> Option<&str> {
        self.rules.get(&symbol).map(|s| s.as_str())
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.rules.contains_key(&symbol)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter<'a>(&'a self) -> impl Iterator<Item=(char, &'a str)> {
        self.rules.iter().map(|(c, s)| (*c, s.as_str()))
    }

    // push the rewrite of a single symbol onto out
    pub fn apply(&self, symbol: char, out: &mut String) {
        match self.rules.get(&symbol) {
            Some(replacement) => out.push_str(replacement),
            None => out.push(symbol)
        }
    }

    // number of symbols the rewrite of a single symbol produces
    fn rewrite_len(&self, symbol: char) -> usize {
        match self.rules.get(&symbol) {
            Some(replacement) => replacement.chars().count(),
            None => 1
        }
    }

}

impl<'a> FromIterator<(char, &'a str)> for RuleSet {

    fn from_iter<I: IntoIterator<Item=(char, &'a str)>>(iter: I) -> Self {

        let mut rules = RuleSet::new();

        for (symbol, replacement) in iter {
            rules.insert(symbol, replacement);
        }

        rules

    }

}

impl From<HashMap<char, String>> for RuleSet {
    fn from(rules: HashMap<char, String>) -> Self {
        RuleSet { rules }
    }
}

//////////////////////////////////////////////////////////////////////
// the L-system itself. strings[0] is the axiom and strings[i + 1]
// is exactly one rewrite pass over strings[i].

#[derive(Debug, Clone, PartialEq)]
pub struct LSystem {

    rules:   RuleSet,
    strings: Vec<String>

}

impl LSystem {

    pub fn new(axiom: &str, rules: RuleSet) -> Self {
        LSystem {
            rules,
            strings: vec![axiom.to_string()]
        }
    }

    pub fn axiom(&self) -> &str {
        &self.strings[0]
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    // latest generation
    pub fn current_string(&self) -> &str {
        // strings is never empty: new() seeds it and reset() keeps [0]
        match self.strings.last() {
            Some(s) => s,
            None => ""
        }
    }

    // number of strings in the history, so 1 right after new()
    pub fn generations(&self) -> usize {
        self.strings.len()
    }

    pub fn history(&self) -> &[String] {
        &self.strings
    }

    pub fn generation(&self, i: usize) -> Option<&str> {
        self.strings.get(i).map(|s| s.as_str())
    }

    // drop every generation after the axiom
    pub fn reset(&mut self) {
        self.strings.truncate(1);
    }

    // number of symbols advance_generation() would produce, without
    // building the string
    pub fn expanded_len(&self) -> usize {
        self.current_string().chars().map(|c| self.rules.rewrite_len(c)).sum()
    }

    /// Rewrite every symbol of the current string in parallel and push
    /// the result onto the history.
    ///
    /// Replacements are never rescanned within the same pass. Returns
    /// the newly produced generation.
    pub fn advance_generation(&mut self) -> &str {

        // symbols, so a lower bound on bytes
        let mut next = String::with_capacity(self.expanded_len());

        for c in self.current_string().chars() {
            self.rules.apply(c, &mut next);
        }

        debug!("generation {:}: {:} symbols", self.strings.len(), next.chars().count());

        self.strings.push(next);

        self.current_string()

    }

    // advance n times; n == 0 leaves the history alone
    pub fn advance_generations(&mut self, n: usize) {

        for _ in 0..n {
            self.advance_generation();
        }

    }

}

//////////////////////////////////////////////////////////////////////
