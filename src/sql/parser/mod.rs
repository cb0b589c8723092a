use std::iter::Peekable;

use miette::{Result, miette};

use crate::sql::lexer::{Lexer, Token};

pub(crate) use ast::*;
pub(crate) use keyword::Keyword;
pub(crate) use literal::Literal;

pub(crate) mod ast;
pub(crate) mod keyword;
pub(crate) mod literal;

/// Parser for a single command line.
///
/// The leading keyword selects the command shape; the rest of the line must
/// match that shape exactly. Any failure means the line is not a command.
pub struct SqlParser<'src> {
    /// Token stream from the lexer
    lexer: Peekable<Lexer<'src>>,
}

impl<'src> SqlParser<'src> {
    /// Creates a new parser for the given command line.
    pub fn new(query: &'src str) -> Self {
        Self {
            lexer: Lexer::new(query).peekable(),
        }
    }

    /// Parses the line and returns the top-level AST node (Statement).
    pub fn parse(&mut self) -> Result<Statement<'src>> {
        let statement = match self.next_token()? {
            Token::Keyword(keyword) => match keyword {
                Keyword::Create => self.parse_create_statement()?,
                Keyword::Insert => self.parse_insert_statement()?,
                Keyword::Select => self.parse_select_statement()?,
                Keyword::Delete => self.parse_delete_statement()?,
                Keyword::Add => self.parse_add_column_statement()?,
                Keyword::Save => self.parse_save_statement()?,
                Keyword::Load => self.parse_load_statement()?,
                Keyword::Update => self.parse_update_statement()?,
                _ => return Err(miette!("Unsupported keyword: {:?}", keyword)),
            },
            token => return Err(miette!("Unexpected token: {:?}", token)),
        };

        if let Some(token) = self.lexer.next() {
            return Err(miette!("Unexpected token after command: {:?}", token?));
        }

        Ok(statement)
    }

    // CREATE TABLE <name> (<col> <TYPE>, ...)
    fn parse_create_statement(&mut self) -> Result<Statement<'src>> {
        self.expect_keyword(Keyword::Table)?;

        let table_name = self.expect_identifier()?;

        self.expect_token(Token::LeftParen)?;
        let columns = self.parse_comma_separated(Self::parse_column_definition)?;
        self.expect_token(Token::RightParen)?;

        Ok(Statement::Create(CreateStatement {
            table_name,
            columns,
        }))
    }

    // INSERT INTO <name> VALUES (<literal>, ...)
    fn parse_insert_statement(&mut self) -> Result<Statement<'src>> {
        self.expect_keyword(Keyword::Into)?;

        let table_name = self.expect_identifier()?;

        self.expect_keyword(Keyword::Values)?;
        self.expect_token(Token::LeftParen)?;
        let values = self.parse_comma_separated(Self::parse_value_literal)?;
        self.expect_token(Token::RightParen)?;

        Ok(Statement::Insert(InsertStatement { table_name, values }))
    }

    // SELECT <* | col, ...> FROM <name> [WHERE <cond>]
    fn parse_select_statement(&mut self) -> Result<Statement<'src>> {
        let select_list = if self.consume_if(Token::Asterisk) {
            SelectList::Star
        } else {
            SelectList::Columns(self.parse_comma_separated(Self::expect_identifier)?)
        };

        self.expect_keyword(Keyword::From)?;

        let table_name = self.expect_identifier()?;

        let where_clause = if self.consume_if(Token::Keyword(Keyword::Where)) {
            Some(self.parse_condition()?)
        } else {
            None
        };

        Ok(Statement::Select(SelectStatement {
            select_list,
            table_name,
            where_clause,
        }))
    }

    // DELETE FROM <name> WHERE <cond>
    fn parse_delete_statement(&mut self) -> Result<Statement<'src>> {
        self.expect_keyword(Keyword::From)?;

        let table_name = self.expect_identifier()?;

        self.expect_keyword(Keyword::Where)?;
        let where_clause = self.parse_condition()?;

        Ok(Statement::Delete(DeleteStatement {
            table_name,
            where_clause,
        }))
    }

    // ADD COLUMN <name> <col> <TYPE>
    fn parse_add_column_statement(&mut self) -> Result<Statement<'src>> {
        self.expect_keyword(Keyword::Column)?;

        let table_name = self.expect_identifier()?;
        let column = self.parse_column_definition()?;

        Ok(Statement::AddColumn(AddColumnStatement { table_name, column }))
    }

    // SAVE TO "<path>"
    fn parse_save_statement(&mut self) -> Result<Statement<'src>> {
        self.expect_keyword(Keyword::To)?;
        let path = self.expect_string()?;

        Ok(Statement::Save(SaveStatement { path }))
    }

    // LOAD FROM "<path>"
    fn parse_load_statement(&mut self) -> Result<Statement<'src>> {
        self.expect_keyword(Keyword::From)?;
        let path = self.expect_string()?;

        Ok(Statement::Load(LoadStatement { path }))
    }

    // UPDATE <name> SET <col>=<value>, ... WHERE <cond> AND <cond> ...
    fn parse_update_statement(&mut self) -> Result<Statement<'src>> {
        let table_name = self.expect_identifier()?;

        self.expect_keyword(Keyword::Set)?;
        let assignments = self.parse_comma_separated(Self::parse_assignment)?;

        self.expect_keyword(Keyword::Where)?;
        let mut conditions = vec![self.parse_condition()?];
        while self.consume_if(Token::Keyword(Keyword::And)) {
            conditions.push(self.parse_condition()?);
        }

        Ok(Statement::Update(UpdateStatement {
            table_name,
            assignments,
            conditions,
        }))
    }

    fn parse_column_definition(&mut self) -> Result<ColumnDefinition<'src>> {
        let name = self.expect_identifier()?;
        let type_name = self
            .expect_identifier()
            .map_err(|e| miette!("Expected a column type: {e}"))?;

        Ok(ColumnDefinition { name, type_name })
    }

    fn parse_assignment(&mut self) -> Result<Assignment<'src>> {
        let column = self.expect_identifier()?;

        match self.next_token()? {
            Token::Comparator("=") => {}
            t => return Err(miette!("Expected '=' in SET, found {:?}", t)),
        }

        let value = self.parse_value_literal()?;

        Ok(Assignment { column, value })
    }

    fn parse_condition(&mut self) -> Result<Condition<'src>> {
        let column = self.expect_identifier()?;

        let comparator = match self.next_token()? {
            Token::Comparator(symbol) => Comparator::from_symbol(symbol),
            t => return Err(miette!("Expected a comparison operator, found {:?}", t)),
        };

        let value = match self.next_token()? {
            Token::Integer(s) => Literal::Integer(s),
            Token::String(s) => Literal::Text(s),
            Token::Identifier(s) => Literal::Word(s),
            Token::Keyword(keyword) => Literal::Word(keyword.into()),
            t => return Err(miette!("Expected a value, found {:?}", t)),
        };

        Ok(Condition {
            column,
            comparator,
            value,
        })
    }

    /// An integer or a double-quoted string.
    fn parse_value_literal(&mut self) -> Result<Literal<'src>> {
        match self.next_token()? {
            Token::Integer(s) => Ok(Literal::Integer(s)),
            Token::String(s) => Ok(Literal::Text(s)),
            t => Err(miette!("Expected an integer or a quoted string, found {:?}", t)),
        }
    }

    /// Parses one or more items separated by commas.
    fn parse_comma_separated<T>(
        &mut self,
        mut parse_item: impl FnMut(&mut Self) -> Result<T>,
    ) -> Result<Vec<T>> {
        let mut items = vec![parse_item(self)?];
        while self.consume_if(Token::Comma) {
            items.push(parse_item(self)?);
        }

        Ok(items)
    }

    fn next_token(&mut self) -> Result<Token<'src>> {
        self.lexer
            .next()
            .transpose()?
            .ok_or_else(|| miette!("Unexpected end of input"))
    }

    fn expect_token(&mut self, expected: Token<'src>) -> Result<()> {
        let token = self.next_token()?;
        if token == expected {
            Ok(())
        } else {
            Err(miette!("Expected {:?}, found {:?}", expected, token))
        }
    }

    fn peek_is(&mut self, expected: &Token) -> bool {
        matches!(self.lexer.peek(), Some(Ok(token)) if token == expected)
    }

    fn consume_if(&mut self, expected: Token) -> bool {
        if self.peek_is(&expected) {
            self.lexer.next();
            true
        } else {
            false
        }
    }

    /// A table or column name. Keywords are accepted here as their own text,
    /// so a column may be called `SET` or `TO`.
    fn expect_identifier(&mut self) -> Result<&'src str> {
        match self.next_token()? {
            Token::Identifier(ident) => Ok(ident),
            Token::Keyword(keyword) => Ok(keyword.into()),
            got => Err(miette!("Expected IDENTIFIER, but found {:?}", got)),
        }
    }

    fn expect_string(&mut self) -> Result<&'src str> {
        match self.next_token()? {
            Token::String(s) => Ok(s),
            got => Err(miette!("Expected a quoted string, but found {:?}", got)),
        }
    }

    fn expect_keyword(&mut self, expected: Keyword) -> Result<()> {
        match self.next_token()? {
            Token::Keyword(kw) if kw == expected => Ok(()),
            other => Err(miette!("Expected {:?}, found {:?}", expected, other)),
        }
    }
}
