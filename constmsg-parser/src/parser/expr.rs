use constmsg_errors::{ParseError, SourceSpan};

use crate::lexer::tokens::{Delimiter, Keyword, Punct, TokenKind};

use super::Parser;

impl<'src> Parser<'src> {
    /// Checks that an expression is well-formed, without building anything from it.
    /// Returns `false` if an error was pushed.
    ///
    /// ```text
    /// expr := unary ((binop unary) | ('as' type))*
    /// ```
    pub fn parse_expr(&mut self, errors: &mut Vec<ParseError<'src>>) -> bool {
        if !self.parse_unary(errors) {
            return false;
        }
        loop {
            match self.current_kind() {
                Some(TokenKind::Punct(p)) if p.is_binary_op() => {
                    self.next();
                    // `a..` has no right-hand side
                    if matches!(p, Punct::DotDot | Punct::DotDotEq) && !self.check_expr_start() {
                        return true;
                    }
                    if !self.parse_unary(errors) {
                        return false;
                    }
                }
                Some(TokenKind::Keyword(Keyword::As)) => {
                    self.next();
                    if !self.parse_type_inner(true, errors) {
                        return false;
                    }
                }
                _ => return true,
            }
        }
    }

    /// Whether the current token can't end an expression, so one must follow.
    fn check_expr_start(&self) -> bool {
        !matches!(
            self.current_kind(),
            None | Some(
                TokenKind::Punct(Punct::Comma | Punct::Semi | Punct::FatArrow)
                    | TokenKind::CloseDelimiter(_)
                    | TokenKind::OpenDelimiter(Delimiter::Brace)
            )
        )
    }

    /// ```text
    /// unary := ('-' | '!' | '*' | '&' 'mut'? | '&&' 'mut'? | '..' | '..=')* postfix
    /// ```
    fn parse_unary(&mut self, errors: &mut Vec<ParseError<'src>>) -> bool {
        loop {
            match self.current_kind() {
                Some(TokenKind::Punct(
                    Punct::Minus | Punct::Bang | Punct::Star | Punct::DotDot | Punct::DotDotEq,
                )) => self.next(),
                Some(TokenKind::Punct(Punct::And | Punct::AndAnd)) => {
                    self.next();
                    self.eat(TokenKind::Keyword(Keyword::Mut));
                }
                _ => break,
            }
        }
        self.parse_postfix(errors)
    }

    /// ```text
    /// postfix := primary ('?' | '.' field_or_method | call | index)*
    /// ```
    fn parse_postfix(&mut self, errors: &mut Vec<ParseError<'src>>) -> bool {
        if !self.parse_primary(errors) {
            return false;
        }
        loop {
            match self.current_kind() {
                Some(TokenKind::Punct(Punct::Question)) => self.next(),
                Some(TokenKind::Punct(Punct::Dot)) => {
                    self.next();
                    match self.current_kind() {
                        Some(TokenKind::Ident(_) | TokenKind::Literal(_)) => self.next(),
                        _ => {
                            errors.push(self.expected("field or method name"));
                            return false;
                        }
                    }
                    if self.check_punct(Punct::PathSep)
                        && self.peek_kind(0) == Some(TokenKind::Punct(Punct::Lt))
                    {
                        self.next();
                        if !self.skip_generic_args(errors) {
                            return false;
                        }
                    }
                }
                Some(TokenKind::OpenDelimiter(Delimiter::Paren)) => {
                    if !self.parse_delimited_exprs(Delimiter::Paren, errors) {
                        return false;
                    }
                }
                Some(TokenKind::OpenDelimiter(Delimiter::Bracket)) => {
                    if !self.parse_delimited_exprs(Delimiter::Bracket, errors) {
                        return false;
                    }
                }
                _ => return true,
            }
        }
    }

    /// ```text
    /// primary
    ///    := literal | 'true' | 'false'
    ///    := path ('!' token_tree | '{' token_tree* '}')?
    ///    := '(' exprs ')' | '[' exprs ']' | '[' expr ';' expr ']'
    ///    := ('unsafe' | 'const')? '{' token_tree* '}'
    ///    := control_flow | closure | 'return' expr?
    ///    := lifetime ':' primary
    /// ```
    fn parse_primary(&mut self, errors: &mut Vec<ParseError<'src>>) -> bool {
        let Some(kind) = self.current_kind() else {
            errors.push(self.expected("expression"));
            return false;
        };
        match kind {
            TokenKind::Literal(_) | TokenKind::Keyword(Keyword::True | Keyword::False) => {
                self.next();
                true
            }
            TokenKind::Ident(_)
            | TokenKind::Keyword(
                Keyword::Crate | Keyword::SelfValue | Keyword::SelfType | Keyword::Super,
            )
            | TokenKind::Punct(Punct::PathSep | Punct::Lt) => {
                if !self.parse_path(errors) {
                    return false;
                }
                match self.current_kind() {
                    Some(TokenKind::Punct(Punct::Bang)) => {
                        self.next();
                        if matches!(self.current_kind(), Some(TokenKind::OpenDelimiter(_))) {
                            self.skip_token_tree(errors)
                        } else {
                            errors.push(self.expected("'(', '[' or '{'"));
                            false
                        }
                    }
                    Some(TokenKind::OpenDelimiter(Delimiter::Brace)) => self.skip_token_tree(errors),
                    _ => true,
                }
            }
            TokenKind::OpenDelimiter(delim @ (Delimiter::Paren | Delimiter::Bracket)) => {
                self.parse_delimited_exprs(delim, errors)
            }
            TokenKind::OpenDelimiter(Delimiter::Brace) => self.skip_token_tree(errors),
            TokenKind::Keyword(Keyword::Unsafe | Keyword::Const | Keyword::Async) => {
                self.next();
                self.eat(TokenKind::Keyword(Keyword::Move));
                if self.check(TokenKind::OpenDelimiter(Delimiter::Brace)) {
                    self.skip_token_tree(errors)
                } else {
                    errors.push(self.expected("'{'"));
                    false
                }
            }
            TokenKind::Keyword(
                Keyword::If | Keyword::Match | Keyword::While | Keyword::For | Keyword::Loop,
            ) => self.skip_control_flow(errors),
            TokenKind::Keyword(Keyword::Move) | TokenKind::Punct(Punct::Or | Punct::OrOr) => {
                self.parse_closure(errors)
            }
            TokenKind::Keyword(Keyword::Return) => {
                self.next();
                match self.current_kind() {
                    None
                    | Some(TokenKind::Punct(Punct::Semi | Punct::Comma))
                    | Some(TokenKind::CloseDelimiter(_)) => true,
                    _ => self.parse_expr(errors),
                }
            }
            TokenKind::Lifetime(_) => {
                self.next();
                self.expect(TokenKind::Punct(Punct::Colon), "':'", errors)
                    && self.parse_primary(errors)
            }
            _ => {
                errors.push(self.expected("expression"));
                false
            }
        }
    }

    /// ```text
    /// path := '::'? (qualified_self '::')? segment ('::' (segment | generic_args))*
    /// qualified_self := '<' type ('as' type)? '>'
    /// ```
    fn parse_path(&mut self, errors: &mut Vec<ParseError<'src>>) -> bool {
        self.eat_punct(Punct::PathSep);
        if self.check_punct(Punct::Lt) {
            if !self.skip_generic_args(errors) {
                return false;
            }
            if !self.expect(TokenKind::Punct(Punct::PathSep), "'::'", errors) {
                return false;
            }
        }
        loop {
            match self.current_kind() {
                Some(TokenKind::Ident(_)) => self.next(),
                Some(TokenKind::Keyword(kw)) if kw.is_path_segment() => self.next(),
                _ => {
                    errors.push(self.expected("path segment"));
                    return false;
                }
            }
            if !self.check_punct(Punct::PathSep) {
                return true;
            }
            self.next();
            if self.check_punct(Punct::Lt) {
                if !self.skip_generic_args(errors) {
                    return false;
                }
                if !self.eat_punct(Punct::PathSep) {
                    return true;
                }
            }
        }
    }

    /// Going into this function, the current token should be the opening `<`.
    fn skip_generic_args(&mut self, errors: &mut Vec<ParseError<'src>>) -> bool {
        let mut depth = 0usize;
        loop {
            match self.current_kind() {
                None => {
                    errors.push(self.expected("'>'"));
                    return false;
                }
                Some(TokenKind::Punct(Punct::Lt)) => {
                    depth += 1;
                    self.next();
                }
                Some(TokenKind::Punct(Punct::Shl)) => {
                    depth += 2;
                    self.next();
                }
                Some(TokenKind::Punct(Punct::Gt)) => {
                    depth = depth.saturating_sub(1);
                    self.next();
                }
                Some(TokenKind::Punct(Punct::Shr)) => {
                    depth = depth.saturating_sub(2);
                    self.next();
                }
                Some(TokenKind::OpenDelimiter(_)) => {
                    if !self.skip_token_tree(errors) {
                        return false;
                    }
                }
                Some(TokenKind::CloseDelimiter(_) | TokenKind::Punct(Punct::Semi)) => {
                    errors.push(self.expected("'>'"));
                    return false;
                }
                _ => self.next(),
            }
            if depth == 0 {
                return true;
            }
        }
    }

    /// Going into this function, the current token should be the opening delimiter.
    /// Brackets also allow the `[expr; len]` form.
    fn parse_delimited_exprs(&mut self, delim: Delimiter, errors: &mut Vec<ParseError<'src>>) -> bool {
        let open = self.here();
        self.next();
        let close = TokenKind::CloseDelimiter(delim);
        let mut first = true;
        loop {
            if self.eat(close) {
                return true;
            }
            if self.current_token.is_none() {
                errors.push(ParseError::UnclosedDelimiter {
                    delim: delim.open_char(),
                    loc: open,
                });
                return false;
            }
            if !self.parse_expr(errors) {
                self.skip_to_close(delim, errors);
                return false;
            }
            if first && delim == Delimiter::Bracket && self.eat_punct(Punct::Semi) {
                if !(self.parse_expr(errors) && self.expect(close, "']'", errors)) {
                    self.skip_to_close(delim, errors);
                    return false;
                }
                return true;
            }
            first = false;
            if !self.eat_punct(Punct::Comma) {
                let ex = match delim {
                    Delimiter::Paren => "',' or ')'",
                    Delimiter::Bracket => "',' or ']'",
                    Delimiter::Brace => "',' or '}'",
                };
                if self.expect(close, ex, errors) {
                    return true;
                }
                self.skip_to_close(delim, errors);
                return false;
            }
        }
    }

    /// After an error inside a delimited group, consume everything up to and
    /// including its closing delimiter.
    fn skip_to_close(&mut self, delim: Delimiter, errors: &mut Vec<ParseError<'src>>) {
        while let Some(kind) = self.current_kind() {
            match kind {
                TokenKind::CloseDelimiter(d) => {
                    if d == delim {
                        self.next();
                    }
                    return;
                }
                TokenKind::OpenDelimiter(_) => {
                    self.skip_token_tree(errors);
                }
                _ => self.next(),
            }
        }
    }

    /// Conditions and bodies of control flow aren't checked, only skipped.
    ///
    /// ```text
    /// control_flow
    ///    := 'if' token* block ('else' (control_flow | block))?
    ///    := ('match' | 'while' | 'for') token* block
    ///    := 'loop' block
    /// ```
    fn skip_control_flow(&mut self, errors: &mut Vec<ParseError<'src>>) -> bool {
        let is_if = self.check_keyword(Keyword::If);
        self.next();
        loop {
            match self.current_kind() {
                Some(TokenKind::OpenDelimiter(Delimiter::Brace)) => break,
                Some(TokenKind::OpenDelimiter(_)) => {
                    if !self.skip_token_tree(errors) {
                        return false;
                    }
                }
                None | Some(TokenKind::Punct(Punct::Semi) | TokenKind::CloseDelimiter(_)) => {
                    errors.push(self.expected("'{'"));
                    return false;
                }
                _ => self.next(),
            }
        }
        if !self.skip_token_tree(errors) {
            return false;
        }
        if is_if && self.eat(TokenKind::Keyword(Keyword::Else)) {
            return match self.current_kind() {
                Some(TokenKind::Keyword(Keyword::If)) => self.skip_control_flow(errors),
                Some(TokenKind::OpenDelimiter(Delimiter::Brace)) => self.skip_token_tree(errors),
                _ => {
                    errors.push(self.expected("'{' or 'if'"));
                    false
                }
            };
        }
        true
    }

    /// ```text
    /// closure := 'move'? ('||' | '|' token* '|') ('->' type block | expr)
    /// ```
    fn parse_closure(&mut self, errors: &mut Vec<ParseError<'src>>) -> bool {
        self.eat(TokenKind::Keyword(Keyword::Move));
        if !self.eat_punct(Punct::OrOr) {
            if !self.expect(TokenKind::Punct(Punct::Or), "'|'", errors) {
                return false;
            }
            loop {
                match self.current_kind() {
                    Some(TokenKind::Punct(Punct::Or)) => {
                        self.next();
                        break;
                    }
                    Some(TokenKind::OpenDelimiter(_)) => {
                        if !self.skip_token_tree(errors) {
                            return false;
                        }
                    }
                    None | Some(TokenKind::CloseDelimiter(_)) => {
                        errors.push(self.expected("'|'"));
                        return false;
                    }
                    _ => self.next(),
                }
            }
        }
        if self.eat_punct(Punct::RArrow) {
            if !self.parse_type(errors) {
                return false;
            }
            if !self.check(TokenKind::OpenDelimiter(Delimiter::Brace)) {
                errors.push(self.expected("'{'"));
                return false;
            }
            return self.skip_token_tree(errors);
        }
        self.parse_expr(errors)
    }

    /// Skips over a type. Returns `false` if the type is empty or malformed.
    ///
    /// The type ends at the first `=`, `;`, `,`, `>` or `{` outside of any generic
    /// arguments, or at a closing delimiter. A `>=` that closes the generic
    /// arguments leaves its `=` as the current token.
    pub fn parse_type(&mut self, errors: &mut Vec<ParseError<'src>>) -> bool {
        self.parse_type_inner(false, errors)
    }

    /// In a cast, binary operators other than `&` and `*` also end the type, so
    /// `x as u8 + 1` stops before the `+`.
    fn parse_type_inner(&mut self, in_cast: bool, errors: &mut Vec<ParseError<'src>>) -> bool {
        let start = self.current_idx();
        let mut depth = 0usize;
        while let Some(kind) = self.current_kind() {
            match kind {
                TokenKind::Punct(Punct::Lt) => depth += 1,
                TokenKind::Punct(Punct::Shl) => depth += 2,
                TokenKind::Punct(Punct::Gt) if depth > 0 => depth -= 1,
                TokenKind::Punct(Punct::Shr) if depth > 1 => depth -= 2,
                // `Option<u8>= None` closes the generics right before the `=`
                TokenKind::Punct(Punct::Ge) if depth == 1 => {
                    self.split_current(1, TokenKind::Punct(Punct::Eq));
                    break;
                }
                TokenKind::Punct(Punct::ShrEq) if depth == 2 => {
                    self.split_current(2, TokenKind::Punct(Punct::Eq));
                    break;
                }
                TokenKind::Punct(Punct::Eq | Punct::Semi | Punct::Comma | Punct::Gt | Punct::Shr)
                    if depth == 0 =>
                {
                    break
                }
                TokenKind::Punct(Punct::And | Punct::AndAnd | Punct::Star) => {}
                TokenKind::Punct(Punct::Plus) if !in_cast => {}
                TokenKind::Punct(p) if depth == 0 && in_cast && p.is_binary_op() => break,
                TokenKind::OpenDelimiter(Delimiter::Brace) if depth == 0 => break,
                TokenKind::OpenDelimiter(_) => {
                    if !self.skip_token_tree(errors) {
                        return false;
                    }
                    continue;
                }
                TokenKind::CloseDelimiter(_) => break,
                _ => {}
            }
            self.next();
        }
        if self.current_idx() == start {
            errors.push(self.expected("type"));
            return false;
        }
        true
    }

    /// Going into this function, the current token should be an opening delimiter.
    /// Consumes everything up to and including the matching closing delimiter.
    pub fn skip_token_tree(&mut self, errors: &mut Vec<ParseError<'src>>) -> bool {
        let mut stack: Vec<(Delimiter, SourceSpan)> = vec![];
        loop {
            let Some(tok) = self.current_token else {
                if let Some(&(delim, loc)) = stack.last() {
                    errors.push(ParseError::UnclosedDelimiter {
                        delim: delim.open_char(),
                        loc,
                    });
                }
                return false;
            };
            match tok.kind {
                TokenKind::OpenDelimiter(delim) => stack.push((delim, tok.span)),
                TokenKind::CloseDelimiter(delim) => match stack.pop() {
                    Some((open, open_loc)) => {
                        if open != delim {
                            errors.push(ParseError::MismatchedDelimiter {
                                open: open.open_char(),
                                close: delim.close_char(),
                                open_loc,
                                loc: tok.span,
                            });
                            self.next();
                            self.skip_tree_rest(stack.len());
                            return false;
                        }
                    }
                    None => {
                        errors.push(ParseError::UnexpectedCloseDelimiter {
                            delim: delim.close_char(),
                            loc: tok.span,
                        });
                        self.next();
                        return false;
                    }
                },
                _ => {}
            }
            self.next();
            if stack.is_empty() {
                return true;
            }
        }
    }

    /// After a mismatched delimiter, keep consuming until `depth` more closing
    /// delimiters have been seen, without reporting them.
    fn skip_tree_rest(&mut self, mut depth: usize) {
        while depth > 0 {
            match self.current_kind() {
                None => return,
                Some(TokenKind::OpenDelimiter(_)) => depth += 1,
                Some(TokenKind::CloseDelimiter(_)) => depth -= 1,
                _ => {}
            }
            self.next();
        }
    }

    /// Skips the rest of an item: up to and including a `;`, or a `{ ... }` block
    /// outside of generic arguments (and a `;` right after it). Stops without
    /// consuming at a closing delimiter that has no match.
    ///
    /// When `recovering` is set, running out of input isn't reported, since an
    /// error has already been pushed for this item.
    pub fn skip_item_rest(&mut self, recovering: bool, errors: &mut Vec<ParseError<'src>>) {
        let mut depth = 0usize;
        loop {
            match self.current_kind() {
                None => {
                    if !recovering {
                        errors.push(self.expected("';' or '{'"));
                    }
                    return;
                }
                Some(TokenKind::Punct(Punct::Semi)) => {
                    self.next();
                    return;
                }
                Some(TokenKind::OpenDelimiter(Delimiter::Brace)) => {
                    self.skip_token_tree(errors);
                    if depth == 0 {
                        self.eat_punct(Punct::Semi);
                        return;
                    }
                }
                Some(TokenKind::OpenDelimiter(_)) => {
                    self.skip_token_tree(errors);
                }
                Some(TokenKind::CloseDelimiter(_)) => return,
                Some(TokenKind::Punct(Punct::Lt)) => {
                    depth += 1;
                    self.next();
                }
                Some(TokenKind::Punct(Punct::Shl)) => {
                    depth += 2;
                    self.next();
                }
                Some(TokenKind::Punct(Punct::Gt)) => {
                    depth = depth.saturating_sub(1);
                    self.next();
                }
                Some(TokenKind::Punct(Punct::Shr)) => {
                    depth = depth.saturating_sub(2);
                    self.next();
                }
                _ => self.next(),
            }
        }
    }
}
