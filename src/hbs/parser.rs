//! Template source parser
//!
//! Two stages: a scanner that splits source into tags and literal text,
//! then a tree builder that pairs block openers with their closers and
//! splits bodies at `{{else}}`.

use crate::hbs::ast::{BlockHelper, Node, Path};
use crate::hbs::errors::HbsError;

/// Parse template source into a node tree
pub fn parse(source: &str) -> Result<Vec<Node>, HbsError> {
    let tokens = scan(source)?;
    let mut index = 0;
    let (nodes, _) = build_sequence(&tokens, &mut index, None)?;
    Ok(nodes)
}

#[derive(Debug)]
enum Token<'a> {
    Text(&'a str),
    Expression {
        path: &'a str,
        raw: bool,
        offset: usize,
    },
    Partial {
        name: &'a str,
        context: Option<&'a str>,
        offset: usize,
    },
    BlockOpen {
        helper: &'a str,
        path: &'a str,
        offset: usize,
    },
    BlockClose {
        helper: &'a str,
        offset: usize,
    },
    Else {
        offset: usize,
    },
}

fn scan(source: &str) -> Result<Vec<Token<'_>>, HbsError> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(found) = source[pos..].find("{{") {
        let open = pos + found;
        if open > pos {
            tokens.push(Token::Text(&source[pos..open]));
        }

        let rest = &source[open..];
        if let Some(after) = rest.strip_prefix("{{!--") {
            let end = after
                .find("--}}")
                .ok_or_else(|| HbsError::syntax(open, "unterminated comment"))?;
            pos = open + 5 + end + 4;
        } else if let Some(after) = rest.strip_prefix("{{!") {
            let end = after
                .find("}}")
                .ok_or_else(|| HbsError::syntax(open, "unterminated comment"))?;
            pos = open + 3 + end + 2;
        } else if let Some(after) = rest.strip_prefix("{{{") {
            let end = after
                .find("}}}")
                .ok_or_else(|| HbsError::syntax(open, "unterminated raw expression"))?;
            let inner = after[..end].trim();
            if inner.is_empty() {
                return Err(HbsError::syntax(open, "empty expression"));
            }
            tokens.push(Token::Expression {
                path: inner,
                raw: true,
                offset: open,
            });
            pos = open + 3 + end + 3;
        } else {
            let after = &rest[2..];
            let end = after
                .find("}}")
                .ok_or_else(|| HbsError::syntax(open, "unterminated tag"))?;
            tokens.push(classify(after[..end].trim(), open)?);
            pos = open + 2 + end + 2;
        }
    }

    if pos < source.len() {
        tokens.push(Token::Text(&source[pos..]));
    }
    Ok(tokens)
}

fn classify(inner: &str, offset: usize) -> Result<Token<'_>, HbsError> {
    if inner.is_empty() {
        return Err(HbsError::syntax(offset, "empty tag"));
    }

    if let Some(rest) = inner.strip_prefix('#') {
        let mut parts = rest.split_whitespace();
        let helper = parts
            .next()
            .ok_or_else(|| HbsError::syntax(offset, "block tag requires a helper name"))?;
        let path = parts.next().ok_or_else(|| {
            HbsError::syntax(offset, format!("block helper '{helper}' requires an argument"))
        })?;
        if parts.next().is_some() {
            return Err(HbsError::syntax(
                offset,
                format!("block helper '{helper}' takes exactly one argument"),
            ));
        }
        return Ok(Token::BlockOpen {
            helper,
            path,
            offset,
        });
    }

    if let Some(rest) = inner.strip_prefix('/') {
        return Ok(Token::BlockClose {
            helper: rest.trim(),
            offset,
        });
    }

    if let Some(rest) = inner.strip_prefix('>') {
        let mut parts = rest.split_whitespace();
        let name = parts
            .next()
            .ok_or_else(|| HbsError::syntax(offset, "partial tag requires a name"))?;
        let context = parts.next();
        if parts.next().is_some() {
            return Err(HbsError::syntax(
                offset,
                "partial tags take at most one context argument",
            ));
        }
        return Ok(Token::Partial {
            name,
            context,
            offset,
        });
    }

    if inner == "else" || inner == "^" {
        return Ok(Token::Else { offset });
    }

    if inner.split_whitespace().count() > 1 {
        return Err(HbsError::syntax(
            offset,
            "expressions with arguments are not supported",
        ));
    }
    Ok(Token::Expression {
        path: inner,
        raw: false,
        offset,
    })
}

/// Build nodes until the close tag of `enclosing` (or end of input),
/// returning the block body and the `{{else}}` branch.
fn build_sequence(
    tokens: &[Token<'_>],
    index: &mut usize,
    enclosing: Option<(&str, usize)>,
) -> Result<(Vec<Node>, Vec<Node>), HbsError> {
    let mut body = Vec::new();
    let mut inverse = Vec::new();
    let mut in_inverse = false;

    while *index < tokens.len() {
        let token = &tokens[*index];
        *index += 1;
        let target = if in_inverse { &mut inverse } else { &mut body };

        match token {
            Token::Text(text) => target.push(Node::Text((*text).to_string())),
            Token::Expression { path, raw, offset } => target.push(Node::Expression {
                path: parse_path(path, *offset)?,
                raw: *raw,
            }),
            Token::Partial {
                name,
                context,
                offset,
            } => target.push(Node::Partial {
                name: (*name).to_string(),
                context: context.map(|path| parse_path(path, *offset)).transpose()?,
            }),
            Token::BlockOpen {
                helper,
                path,
                offset,
            } => {
                let kind = match *helper {
                    "each" => BlockHelper::Each,
                    "if" => BlockHelper::If,
                    other => {
                        return Err(HbsError::UnknownHelper {
                            name: other.to_string(),
                            offset: *offset,
                        });
                    }
                };
                let path = parse_path(path, *offset)?;
                let (block_body, block_inverse) =
                    build_sequence(tokens, index, Some((*helper, *offset)))?;
                target.push(Node::Block {
                    helper: kind,
                    path,
                    body: block_body,
                    inverse: block_inverse,
                });
            }
            Token::BlockClose { helper, offset } => match enclosing {
                Some((open_helper, _)) if *helper == open_helper => return Ok((body, inverse)),
                Some((open_helper, _)) => {
                    return Err(HbsError::syntax(
                        *offset,
                        format!("expected {{{{/{open_helper}}}}}, found {{{{/{helper}}}}}"),
                    ));
                }
                None => {
                    return Err(HbsError::syntax(
                        *offset,
                        format!("unexpected closing tag {{{{/{helper}}}}}"),
                    ));
                }
            },
            Token::Else { offset } => {
                if enclosing.is_none() {
                    return Err(HbsError::syntax(*offset, "{{else}} outside of a block"));
                }
                if in_inverse {
                    return Err(HbsError::syntax(*offset, "duplicate {{else}} in block"));
                }
                in_inverse = true;
            }
        }
    }

    match enclosing {
        Some((helper, offset)) => Err(HbsError::syntax(
            offset,
            format!("unclosed block {{{{#{helper}}}}}"),
        )),
        None => Ok((body, inverse)),
    }
}

fn parse_path(raw: &str, offset: usize) -> Result<Path, HbsError> {
    if let Some(local) = raw.strip_prefix('@') {
        return match local {
            "index" | "first" | "last" | "key" => Ok(Path::Local(local.to_string())),
            other => Err(HbsError::syntax(
                offset,
                format!("unknown data variable '@{other}'"),
            )),
        };
    }

    if raw == "this" || raw == "." {
        return Ok(Path::This);
    }

    let trimmed = raw
        .strip_prefix("this.")
        .or_else(|| raw.strip_prefix("./"))
        .unwrap_or(raw);
    let segments: Vec<String> = trimmed.split('.').map(str::to_string).collect();
    if segments.iter().any(String::is_empty) {
        return Err(HbsError::syntax(offset, format!("invalid path '{raw}'")));
    }
    Ok(Path::Segments(segments))
}
