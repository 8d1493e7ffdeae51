//! Tokenizes a disassembly line into position-indexed atoms:
//! `t0` is the raw encoding, `t1` the mnemonic, and `t2..` the operands —
//! with a parenthesized `offset(reg)` form split into two atoms so that
//! positional lookups line up the same way for every addressing shape.

pub fn tokenize(disas: &str) -> Vec<String> {
    let mut parts = disas.split_whitespace();
    let mut tokens = Vec::new();

    if let Some(raw) = parts.next() {
        tokens.push(raw.to_string());
    }
    if let Some(mnemonic) = parts.next() {
        tokens.push(mnemonic.to_string());
    }

    let rest: Vec<&str> = parts.collect();
    let rest = rest.join(" ");
    for operand in rest.split(',') {
        let operand = operand.trim();
        if operand.is_empty() {
            continue;
        }
        if let Some(open) = operand.find('(') {
            let offset = operand[..open].trim();
            let reg = operand[open + 1..].trim_end_matches(')').trim();
            tokens.push(offset.to_string());
            tokens.push(reg.to_string());
        } else {
            tokens.push(operand.to_string());
        }
    }
    tokens
}
