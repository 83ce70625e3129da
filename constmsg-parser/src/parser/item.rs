use constmsg_errors::ParseError;

use crate::ast::{DeclKind, Declaration, Ident};
use crate::lexer::tokens::{Comment, Delimiter, Keyword, LiteralToken, Punct, TokenKind};

use super::Parser;

impl<'src> Parser<'src> {
    /// Collect the comment blocks leading any of the tokens at `anchors`, in order.
    fn leading_comments(&self, anchors: &[usize]) -> Vec<Comment<'src>> {
        let mut comments: Vec<Comment<'src>> = vec![];
        for &idx in anchors {
            for comment in self.comments.block_before(idx) {
                if !comments.contains(comment) {
                    comments.push(*comment);
                }
            }
        }
        comments
    }

    /// Consume the outer attributes in front of an item or variant, returning the
    /// token indices they start at, followed by the index of the token after them.
    fn parse_outer_attributes(&mut self, errors: &mut Vec<ParseError<'src>>) -> Vec<usize> {
        let mut anchors = vec![];
        while self.check_punct(Punct::Pound) {
            anchors.push(self.current_idx());
            self.parse_attribute(errors);
        }
        anchors.push(self.current_idx());
        anchors
    }

    /// Parses an item and adds its declarations to `decls`.
    ///
    /// Going into this function, the current token should be the first
    /// token of this grammar.
    ///
    /// ```text
    /// item
    ///    := attribute* visibility? item_kind
    /// item_kind
    ///    := const_item | static_item | fn_item | struct_item | union_item
    ///    := enum_item | type_item | trait_item | impl_item | mod_item
    ///    := use_item | extern_item | macro_item
    /// ```
    pub fn parse_item(
        &mut self,
        decls: &mut Vec<Declaration<'src>>,
        errors: &mut Vec<ParseError<'src>>,
    ) {
        assert!(self.current_token.is_some());

        let start = self.here();
        let anchors = self.parse_outer_attributes(errors);
        let mut comments = self.leading_comments(&anchors);
        self.parse_visibility(errors);

        let mut variants = vec![];
        let (kind, names) = match self.current_kind() {
            Some(TokenKind::Keyword(Keyword::Const)) => match self.peek_kind(0) {
                Some(TokenKind::Keyword(
                    Keyword::Fn | Keyword::Unsafe | Keyword::Async | Keyword::Extern,
                )) => self.parse_fn(errors),
                _ => self.parse_const(errors),
            },
            Some(TokenKind::Keyword(Keyword::Static)) => self.parse_static(errors),
            Some(TokenKind::Keyword(Keyword::Fn | Keyword::Async)) => self.parse_fn(errors),
            Some(TokenKind::Keyword(Keyword::Unsafe)) => match self.peek_kind(0) {
                Some(TokenKind::Keyword(Keyword::Impl)) => self.parse_impl(errors),
                Some(TokenKind::Keyword(Keyword::Trait)) => {
                    self.next();
                    self.parse_named_item(DeclKind::Trait, errors)
                }
                Some(TokenKind::Keyword(Keyword::Extern)) => {
                    self.next();
                    self.parse_extern(errors)
                }
                _ => self.parse_fn(errors),
            },
            Some(TokenKind::Keyword(Keyword::Extern)) => self.parse_extern(errors),
            Some(TokenKind::Keyword(Keyword::Struct)) => {
                self.parse_named_item(DeclKind::Struct, errors)
            }
            Some(TokenKind::Ident("union")) if matches!(self.peek_kind(0), Some(TokenKind::Ident(_))) => {
                self.parse_named_item(DeclKind::Union, errors)
            }
            Some(TokenKind::Keyword(Keyword::Enum)) => self.parse_enum(&mut variants, errors),
            Some(TokenKind::Keyword(Keyword::Type)) => self.parse_named_item(DeclKind::Type, errors),
            Some(TokenKind::Keyword(Keyword::Trait)) => {
                self.parse_named_item(DeclKind::Trait, errors)
            }
            Some(TokenKind::Keyword(Keyword::Impl)) => self.parse_impl(errors),
            Some(TokenKind::Keyword(Keyword::Mod)) => self.parse_mod(errors),
            Some(TokenKind::Keyword(Keyword::Use)) => self.parse_use(errors),
            Some(TokenKind::Ident(_) | TokenKind::Punct(Punct::PathSep))
                if self.check_macro_item() =>
            {
                self.parse_macro_item(errors)
            }
            Some(TokenKind::CloseDelimiter(delim)) => {
                errors.push(ParseError::UnexpectedCloseDelimiter {
                    delim: delim.close_char(),
                    loc: self.here(),
                });
                self.next();
                return;
            }
            _ => {
                errors.push(self.expected("item"));
                self.skip_item_rest(true, errors);
                return;
            }
        };

        let span = self.span_from(start);
        comments.extend_from_slice(self.trailing_comments());
        decls.push(Declaration {
            names,
            kind,
            parent: None,
            comments,
            span,
        });
        decls.extend(variants);
    }

    /// Parses an attribute.
    ///
    /// Going into this function, the current token should be the '#'.
    ///
    /// ```text
    /// attribute := '#' '!'? '[' token_tree* ']'
    /// ```
    pub fn parse_attribute(&mut self, errors: &mut Vec<ParseError<'src>>) {
        assert!(self.check_punct(Punct::Pound));
        self.next();
        self.eat_punct(Punct::Bang);
        if self.check(TokenKind::OpenDelimiter(Delimiter::Bracket)) {
            self.skip_token_tree(errors);
        } else {
            errors.push(self.expected("'['"));
        }
    }

    /// ```text
    /// visibility := ('pub' ('(' token_tree* ')')?)?
    /// ```
    pub fn parse_visibility(&mut self, errors: &mut Vec<ParseError<'src>>) {
        if self.eat(TokenKind::Keyword(Keyword::Pub))
            && self.check(TokenKind::OpenDelimiter(Delimiter::Paren))
        {
            self.skip_token_tree(errors);
        }
    }

    /// Parses the name of an item. `_` is accepted, but doesn't count as a name.
    fn parse_item_name(&mut self, errors: &mut Vec<ParseError<'src>>) -> Option<Vec<Ident<'src>>> {
        match self.current_token {
            Some(tok) => match tok.kind {
                TokenKind::Ident("_") => {
                    self.next();
                    Some(vec![])
                }
                TokenKind::Ident(name) => {
                    self.next();
                    Some(vec![Ident {
                        name,
                        span: tok.span,
                    }])
                }
                _ => {
                    errors.push(self.expected("identifier"));
                    None
                }
            },
            None => {
                errors.push(self.expected("identifier"));
                None
            }
        }
    }

    /// Going into this function, the current token is assumed to be `const`.
    ///
    /// ```text
    /// const_item := 'const' (ident | '_') ':' type '=' expr ';'
    /// ```
    pub fn parse_const(
        &mut self,
        errors: &mut Vec<ParseError<'src>>,
    ) -> (DeclKind, Vec<Ident<'src>>) {
        assert!(self.check_keyword(Keyword::Const));
        self.next();
        let names = self.parse_value_rest(errors);
        (DeclKind::Const, names)
    }

    /// Going into this function, the current token is assumed to be `static`.
    ///
    /// ```text
    /// static_item := 'static' 'mut'? ident ':' type '=' expr ';'
    /// ```
    pub fn parse_static(
        &mut self,
        errors: &mut Vec<ParseError<'src>>,
    ) -> (DeclKind, Vec<Ident<'src>>) {
        assert!(self.check_keyword(Keyword::Static));
        self.next();
        let kind = if self.eat(TokenKind::Keyword(Keyword::Mut)) {
            DeclKind::StaticMut
        } else {
            DeclKind::Static
        };
        let names = self.parse_value_rest(errors);
        (kind, names)
    }

    /// The part of constants and statics after the keywords:
    ///
    /// ```text
    /// ident ':' type '=' expr ';'
    /// ```
    ///
    /// On error, skips to the end of the item.
    fn parse_value_rest(&mut self, errors: &mut Vec<ParseError<'src>>) -> Vec<Ident<'src>> {
        let Some(names) = self.parse_item_name(errors) else {
            self.skip_item_rest(true, errors);
            return vec![];
        };

        let ok = self.expect(TokenKind::Punct(Punct::Colon), "':'", errors)
            && self.parse_type(errors)
            && self.expect(TokenKind::Punct(Punct::Eq), "'='", errors)
            && self.parse_expr(errors)
            && self.expect(TokenKind::Punct(Punct::Semi), "';'", errors);
        if !ok {
            self.skip_item_rest(true, errors);
        }
        names
    }

    /// Going into this function, the current token is assumed to be one of the
    /// qualifiers or `fn`.
    ///
    /// ```text
    /// fn_item := 'const'? 'async'? 'unsafe'? ('extern' string?)? 'fn' ident token_tree* (block | ';')
    /// ```
    pub fn parse_fn(&mut self, errors: &mut Vec<ParseError<'src>>) -> (DeclKind, Vec<Ident<'src>>) {
        loop {
            match self.current_kind() {
                Some(TokenKind::Keyword(
                    Keyword::Const | Keyword::Async | Keyword::Unsafe | Keyword::Extern,
                ))
                | Some(TokenKind::Literal(LiteralToken::Str(_))) => self.next(),
                _ => break,
            }
        }
        if !self.expect(TokenKind::Keyword(Keyword::Fn), "'fn'", errors) {
            self.skip_item_rest(true, errors);
            return (DeclKind::Fn, vec![]);
        }
        let names = self.parse_item_name(errors).unwrap_or_default();
        self.skip_item_rest(false, errors);
        (DeclKind::Fn, names)
    }

    /// Items whose contents don't matter: structs, unions, type aliases and traits.
    /// Going into this function, the current token is assumed to be the keyword.
    ///
    /// ```text
    /// named_item := keyword ident token_tree* (block | ';')
    /// ```
    pub fn parse_named_item(
        &mut self,
        kind: DeclKind,
        errors: &mut Vec<ParseError<'src>>,
    ) -> (DeclKind, Vec<Ident<'src>>) {
        self.next();
        let names = self.parse_item_name(errors).unwrap_or_default();
        self.skip_item_rest(false, errors);
        (kind, names)
    }

    /// Going into this function, the current token is assumed to be `impl` or `unsafe`.
    pub fn parse_impl(&mut self, errors: &mut Vec<ParseError<'src>>) -> (DeclKind, Vec<Ident<'src>>) {
        self.eat(TokenKind::Keyword(Keyword::Unsafe));
        self.next();
        self.skip_item_rest(false, errors);
        (DeclKind::Block, vec![])
    }

    /// Going into this function, the current token is assumed to be `mod`.
    ///
    /// ```text
    /// mod_item := 'mod' ident (';' | '{' token_tree* '}')
    /// ```
    pub fn parse_mod(&mut self, errors: &mut Vec<ParseError<'src>>) -> (DeclKind, Vec<Ident<'src>>) {
        assert!(self.check_keyword(Keyword::Mod));
        self.next();
        let names = self.parse_item_name(errors).unwrap_or_default();
        if self.check(TokenKind::OpenDelimiter(Delimiter::Brace)) {
            self.skip_token_tree(errors);
        } else if !self.expect(TokenKind::Punct(Punct::Semi), "';' or '{'", errors) {
            self.skip_item_rest(true, errors);
        }
        (DeclKind::Mod, names)
    }

    /// Going into this function, the current token is assumed to be `extern`.
    ///
    /// ```text
    /// extern_item
    ///    := 'extern' 'crate' ident ('as' (ident | '_'))? ';'
    ///    := 'extern' string? '{' token_tree* '}'
    ///    := fn_item
    /// ```
    pub fn parse_extern(&mut self, errors: &mut Vec<ParseError<'src>>) -> (DeclKind, Vec<Ident<'src>>) {
        assert!(self.check_keyword(Keyword::Extern));

        match self.peek_kind(0) {
            Some(TokenKind::Keyword(Keyword::Crate)) => {
                self.next();
                self.next();
                let mut names = self.parse_item_name(errors).unwrap_or_default();
                if self.eat(TokenKind::Keyword(Keyword::As)) {
                    names = self.parse_item_name(errors).unwrap_or_default();
                }
                if !self.expect(TokenKind::Punct(Punct::Semi), "';'", errors) {
                    self.skip_item_rest(true, errors);
                }
                (DeclKind::ExternCrate, names)
            }
            Some(TokenKind::Keyword(Keyword::Fn | Keyword::Unsafe)) => self.parse_fn(errors),
            Some(TokenKind::Literal(LiteralToken::Str(_)))
                if matches!(
                    self.peek_kind(1),
                    Some(TokenKind::Keyword(Keyword::Fn | Keyword::Unsafe))
                ) =>
            {
                self.parse_fn(errors)
            }
            _ => {
                self.next();
                self.skip_item_rest(false, errors);
                (DeclKind::Block, vec![])
            }
        }
    }

    /// Going into this function, the current token is assumed to be `enum`.
    /// The variants are added to `variants`.
    ///
    /// ```text
    /// enum_item := 'enum' ident token_tree* '{' (variant (',' variant)* ','?)? '}'
    /// ```
    pub fn parse_enum(
        &mut self,
        variants: &mut Vec<Declaration<'src>>,
        errors: &mut Vec<ParseError<'src>>,
    ) -> (DeclKind, Vec<Ident<'src>>) {
        assert!(self.check_keyword(Keyword::Enum));
        self.next();
        let names = self.parse_item_name(errors).unwrap_or_default();

        // generics and where clauses
        while let Some(kind) = self.current_kind() {
            match kind {
                TokenKind::OpenDelimiter(Delimiter::Brace) => break,
                TokenKind::OpenDelimiter(_) => {
                    self.skip_token_tree(errors);
                }
                TokenKind::Punct(Punct::Semi) | TokenKind::CloseDelimiter(_) => break,
                _ => self.next(),
            }
        }

        if self.check(TokenKind::OpenDelimiter(Delimiter::Brace)) {
            let parent = names.first().map(|id| id.name);
            self.parse_enum_body(parent, variants, errors);
        } else {
            errors.push(self.expected("'{'"));
            self.skip_item_rest(true, errors);
        }
        (DeclKind::Enum, names)
    }

    /// Going into this function, the current token is assumed to be the `{`.
    ///
    /// ```text
    /// variant := attribute* visibility? ident ('(' token_tree* ')' | '{' token_tree* '}')? ('=' expr)?
    /// ```
    fn parse_enum_body(
        &mut self,
        parent: Option<&'src str>,
        variants: &mut Vec<Declaration<'src>>,
        errors: &mut Vec<ParseError<'src>>,
    ) {
        let open = self.here();
        self.next();

        loop {
            match self.current_kind() {
                None => {
                    errors.push(ParseError::UnclosedDelimiter {
                        delim: '{',
                        loc: open,
                    });
                    return;
                }
                Some(TokenKind::CloseDelimiter(Delimiter::Brace)) => {
                    self.next();
                    return;
                }
                _ => {}
            }

            let start = self.here();
            let anchors = self.parse_outer_attributes(errors);
            let mut comments = self.leading_comments(&anchors);
            self.parse_visibility(errors);

            let name = match self.current_token {
                Some(tok) => match tok.kind {
                    TokenKind::Ident(name) => {
                        self.next();
                        Ident {
                            name,
                            span: tok.span,
                        }
                    }
                    _ => {
                        errors.push(self.expected("variant name"));
                        self.skip_variant_rest(errors);
                        continue;
                    }
                },
                None => continue,
            };

            let kind = match self.current_kind() {
                Some(TokenKind::OpenDelimiter(Delimiter::Paren)) => {
                    self.skip_token_tree(errors);
                    DeclKind::TupleVariant
                }
                Some(TokenKind::OpenDelimiter(Delimiter::Brace)) => {
                    self.skip_token_tree(errors);
                    DeclKind::StructVariant
                }
                _ => DeclKind::UnitVariant,
            };

            let mut ok = true;
            if self.eat_punct(Punct::Eq) {
                ok = self.parse_expr(errors);
            }

            let span = self.span_from(start);
            if !ok {
                self.skip_variant_rest(errors);
            } else if !self.eat_punct(Punct::Comma)
                && !self.check(TokenKind::CloseDelimiter(Delimiter::Brace))
            {
                errors.push(self.expected("',' or '}'"));
                self.skip_variant_rest(errors);
            }
            comments.extend_from_slice(self.trailing_comments());

            variants.push(Declaration {
                names: vec![name],
                kind,
                parent,
                comments,
                span,
            });
        }
    }

    /// Skip to the start of the next variant, or to the `}` closing the enum.
    fn skip_variant_rest(&mut self, errors: &mut Vec<ParseError<'src>>) {
        while let Some(kind) = self.current_kind() {
            match kind {
                TokenKind::Punct(Punct::Comma) => {
                    self.next();
                    return;
                }
                TokenKind::CloseDelimiter(Delimiter::Brace) => return,
                TokenKind::OpenDelimiter(_) => {
                    self.skip_token_tree(errors);
                }
                _ => self.next(),
            }
        }
    }

    /// Going into this function, the current token is assumed to be `use`.
    ///
    /// ```text
    /// use_item := 'use' use_tree ';'
    /// ```
    pub fn parse_use(&mut self, errors: &mut Vec<ParseError<'src>>) -> (DeclKind, Vec<Ident<'src>>) {
        assert!(self.check_keyword(Keyword::Use));
        self.next();
        let mut names = vec![];
        let ok = self.parse_use_tree(None, &mut names, errors)
            && self.expect(TokenKind::Punct(Punct::Semi), "';'", errors);
        if !ok {
            self.skip_item_rest(true, errors);
        }
        (DeclKind::Use, names)
    }

    /// Collects the names a use tree brings into scope. `parent` is the last
    /// path segment before a group, which is what `self` refers to in it.
    ///
    /// ```text
    /// use_tree
    ///    := '::'? (segment '::')* '*'
    ///    := '::'? (segment '::')* '{' (use_tree (',' use_tree)* ','?)? '}'
    ///    := '::'? (segment '::')* segment ('as' (ident | '_'))?
    /// ```
    fn parse_use_tree(
        &mut self,
        mut parent: Option<Ident<'src>>,
        names: &mut Vec<Ident<'src>>,
        errors: &mut Vec<ParseError<'src>>,
    ) -> bool {
        self.eat_punct(Punct::PathSep);
        loop {
            let Some(tok) = self.current_token else {
                errors.push(self.expected("path segment"));
                return false;
            };
            match tok.kind {
                TokenKind::Punct(Punct::Star) => {
                    self.next();
                    return true;
                }
                TokenKind::OpenDelimiter(Delimiter::Brace) => {
                    let open = tok.span;
                    self.next();
                    loop {
                        if self.eat(TokenKind::CloseDelimiter(Delimiter::Brace)) {
                            return true;
                        }
                        if self.current_token.is_none() {
                            errors.push(ParseError::UnclosedDelimiter {
                                delim: '{',
                                loc: open,
                            });
                            return false;
                        }
                        if !self.parse_use_tree(parent, names, errors) {
                            return false;
                        }
                        if !self.eat_punct(Punct::Comma) {
                            return self.expect(
                                TokenKind::CloseDelimiter(Delimiter::Brace),
                                "',' or '}'",
                                errors,
                            );
                        }
                    }
                }
                TokenKind::Ident(_)
                | TokenKind::Keyword(
                    Keyword::Crate | Keyword::SelfValue | Keyword::SelfType | Keyword::Super,
                ) => {
                    let segment = Ident {
                        name: tok.kind.as_str(),
                        span: tok.span,
                    };
                    self.next();
                    if self.eat_punct(Punct::PathSep) {
                        parent = Some(segment);
                        continue;
                    }
                    if self.eat(TokenKind::Keyword(Keyword::As)) {
                        match self.parse_item_name(errors) {
                            Some(alias) => names.extend(alias),
                            None => return false,
                        }
                    } else if segment.name == "self" {
                        names.extend(parent);
                    } else {
                        names.push(segment);
                    }
                    return true;
                }
                _ => {
                    errors.push(self.expected("path segment"));
                    return false;
                }
            }
        }
    }

    /// Whether the current token starts a macro call or `macro_rules!` definition.
    fn check_macro_item(&self) -> bool {
        let mut n = 0;
        // path segments and separators, then `!`
        let mut kind = self.current_kind();
        loop {
            match kind {
                Some(TokenKind::Ident(_) | TokenKind::Punct(Punct::PathSep)) => {}
                Some(TokenKind::Punct(Punct::Bang)) => return n > 0,
                _ => return false,
            }
            kind = self.peek_kind(n);
            n += 1;
        }
    }

    /// Going into this function, the current token is assumed to be the first token of
    /// the macro path.
    ///
    /// ```text
    /// macro_item
    ///    := 'macro_rules' '!' ident token_tree ';'?
    ///    := path '!' token_tree ';'?
    /// ```
    pub fn parse_macro_item(&mut self, errors: &mut Vec<ParseError<'src>>) -> (DeclKind, Vec<Ident<'src>>) {
        let is_macro_rules = self.check(TokenKind::Ident("macro_rules"));
        while !self.check_punct(Punct::Bang) {
            self.next();
        }
        self.next();

        let names = if is_macro_rules {
            self.parse_item_name(errors).unwrap_or_default()
        } else {
            vec![]
        };

        match self.current_kind() {
            Some(TokenKind::OpenDelimiter(Delimiter::Brace)) => {
                self.skip_token_tree(errors);
                self.eat_punct(Punct::Semi);
            }
            Some(TokenKind::OpenDelimiter(_)) => {
                self.skip_token_tree(errors);
                self.expect(TokenKind::Punct(Punct::Semi), "';'", errors);
            }
            _ => {
                errors.push(self.expected("'(', '[' or '{'"));
                self.skip_item_rest(true, errors);
            }
        }
        (DeclKind::Macro, names)
    }
}
