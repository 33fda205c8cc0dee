#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Klotski level loader.
//!
//! This crate defines the values that flow between the loading stages. The
//! scanner turns catalog text into [`LevelRecord`] values, the grid parser turns
//! each record into a [`Board`], and the validator inspects boards and reports
//! [`ValidationIssue`] values. Every stage produces new immutable values; none
//! of them mutates the output of a previous stage.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Character that opens and closes a board row in catalog text.
pub const ROW_DELIMITER: char = '@';

/// Marker that opens and closes a level description in catalog text.
pub const DESCRIPTION_DELIMITER: &str = "@@";

/// Leading character of a comment line.
pub const COMMENT_MARKER: char = '#';

/// Characters that name ordinary pieces, in canonical order.
pub const PIECE_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Fixed table of the non-piece symbols recognised inside a board row.
pub const SYMBOL_TABLE: [(char, Symbol); 5] = [
    ('#', Symbol::Wall),
    ('-', Symbol::OneWayWall),
    ('.', Symbol::Destination),
    ('*', Symbol::Heart),
    (' ', Symbol::Empty),
];

/// Meaning of a single character inside a board row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// Wall that blocks every piece.
    Wall,
    /// Wall that only the heart piece may cross.
    OneWayWall,
    /// Target cell for the heart piece.
    Destination,
    /// Part of the heart piece.
    Heart,
    /// Open floor.
    Empty,
    /// Part of the ordinary piece named by the character.
    Piece(char),
}

impl Symbol {
    /// Classifies a board character, returning `None` for unknown symbols.
    #[must_use]
    pub fn classify(character: char) -> Option<Self> {
        if let Some((_, symbol)) = SYMBOL_TABLE.iter().find(|(key, _)| *key == character) {
            return Some(*symbol);
        }

        if PIECE_ALPHABET.contains(character) {
            Some(Self::Piece(character))
        } else {
            None
        }
    }

    /// Character that encodes the symbol in catalog text.
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Self::Piece(character) => character,
            other => SYMBOL_TABLE
                .iter()
                .find(|(_, symbol)| *symbol == other)
                .map_or(' ', |(character, _)| *character),
        }
    }
}

/// Cardinal directions used for unit translations across the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing column indices.
    East,
    /// Toward increasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
}

impl Direction {
    /// All four directions in clockwise order starting at north.
    pub const ALL: [Direction; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Row and column delta of a single step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i64, i64) {
        match self {
            Self::North => (-1, 0),
            Self::East => (0, 1),
            Self::South => (1, 0),
            Self::West => (0, -1),
        }
    }
}

/// Location of a single grid cell, zero-indexed with rows increasing downward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    row: u32,
    column: u32,
}

impl Coordinate {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Translates the coordinate, returning `None` when it would leave the
    /// non-negative quadrant.
    #[must_use]
    pub fn offset(self, rows: i64, columns: i64) -> Option<Self> {
        let row = u32::try_from(i64::from(self.row).checked_add(rows)?).ok()?;
        let column = u32::try_from(i64::from(self.column).checked_add(columns)?).ok()?;
        Some(Self::new(row, column))
    }

    /// Neighbour one step away in the provided direction, if it is non-negative.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        let (rows, columns) = direction.delta();
        self.offset(rows, columns)
    }

    /// Edge-adjacent neighbours that lie inside a `width` × `height` grid.
    pub fn neighbors(self, width: u32, height: u32) -> impl Iterator<Item = Coordinate> {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| self.step(direction))
            .filter(move |cell| cell.column < width && cell.row < height)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Identifier of a piece within one board.
///
/// The heart piece is keyed separately from ordinary pieces even though its
/// source character is `*`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceId {
    /// The single heart piece.
    Heart,
    /// Ordinary piece named by its case-sensitive source character.
    Symbol(char),
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Heart => write!(f, "heart"),
            Self::Symbol(character) => write!(f, "{character}"),
        }
    }
}

/// Semantic content of one grid position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Open floor.
    Empty,
    /// Impassable to all pieces.
    Wall,
    /// Impassable to ordinary pieces, passable by the heart piece.
    OneWayWall,
    /// Open floor that counts toward the win condition.
    Destination,
    /// Floor currently covered by part of a piece.
    PieceOccupied(PieceId),
}

impl Cell {
    /// Converts a classified symbol into the cell it denotes.
    #[must_use]
    pub const fn from_symbol(symbol: Symbol) -> Self {
        match symbol {
            Symbol::Wall => Self::Wall,
            Symbol::OneWayWall => Self::OneWayWall,
            Symbol::Destination => Self::Destination,
            Symbol::Heart => Self::PieceOccupied(PieceId::Heart),
            Symbol::Empty => Self::Empty,
            Symbol::Piece(character) => Self::PieceOccupied(PieceId::Symbol(character)),
        }
    }

    /// Symbol that denotes the cell in catalog text.
    #[must_use]
    pub const fn symbol(self) -> Symbol {
        match self {
            Self::Empty => Symbol::Empty,
            Self::Wall => Symbol::Wall,
            Self::OneWayWall => Symbol::OneWayWall,
            Self::Destination => Symbol::Destination,
            Self::PieceOccupied(PieceId::Heart) => Symbol::Heart,
            Self::PieceOccupied(PieceId::Symbol(character)) => Symbol::Piece(character),
        }
    }

    /// Character that encodes the cell in catalog text.
    #[must_use]
    pub fn as_char(self) -> char {
        self.symbol().as_char()
    }

    /// Piece covering the cell, if any.
    #[must_use]
    pub const fn piece(self) -> Option<PieceId> {
        match self {
            Self::PieceOccupied(id) => Some(id),
            _ => None,
        }
    }
}

/// Named multi-cell shape occupying part of a board.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    id: PieceId,
    cells: BTreeSet<Coordinate>,
}

impl Piece {
    /// Creates a piece from its identifier and occupied cells.
    ///
    /// Returns `None` when `cells` is empty.
    #[must_use]
    pub fn new(id: PieceId, cells: BTreeSet<Coordinate>) -> Option<Self> {
        if cells.is_empty() {
            None
        } else {
            Some(Self { id, cells })
        }
    }

    /// Identifier of the piece.
    #[must_use]
    pub const fn id(&self) -> PieceId {
        self.id
    }

    /// Reports whether this is the heart piece.
    #[must_use]
    pub const fn is_heart(&self) -> bool {
        matches!(self.id, PieceId::Heart)
    }

    /// Cells occupied by the piece in row-major order.
    #[must_use]
    pub fn cells(&self) -> &BTreeSet<Coordinate> {
        &self.cells
    }

    /// Number of cells the piece covers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`; a piece covers at least one cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reports whether the piece covers the provided cell.
    #[must_use]
    pub fn contains(&self, cell: Coordinate) -> bool {
        self.cells.contains(&cell)
    }

    /// Upper-left corner of the piece's bounding box.
    #[must_use]
    pub fn origin(&self) -> Coordinate {
        let row = self.cells.iter().map(Coordinate::row).min().unwrap_or(0);
        let column = self.cells.iter().map(Coordinate::column).min().unwrap_or(0);
        Coordinate::new(row, column)
    }
}

/// Raw level text extracted by the scanner, prior to grid parsing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRecord {
    /// Level name taken from the `<Name>` header.
    pub name: String,
    /// Optional description taken from a `@@...@@` line; empty when absent.
    pub description: String,
    /// One-based catalog line of the header.
    pub line: usize,
    /// Board rows with their `@` delimiters removed, spaces preserved.
    pub raw_lines: Vec<String>,
}

/// Grid of cells plus the piece registry derived from it.
///
/// The registry is always rebuilt from the cells, so every occupied cell has a
/// registry entry and every entry covers at least one occupied cell. Rows may
/// be ragged when a board is assembled by hand; the grid parser always pads
/// them to `width`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    name: String,
    description: String,
    width: u32,
    height: u32,
    rows: Vec<Vec<Cell>>,
    pieces: BTreeMap<PieceId, Piece>,
}

impl Board {
    /// Assembles a board from rows of cells.
    ///
    /// `width` is the longest row and `height` the number of rows.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let width = u32::try_from(width).unwrap_or(u32::MAX);
        let height = u32::try_from(rows.len()).unwrap_or(u32::MAX);

        let mut occupied: BTreeMap<PieceId, BTreeSet<Coordinate>> = BTreeMap::new();
        for (row_index, row) in (0_u32..).zip(&rows) {
            for (column_index, cell) in (0_u32..).zip(row) {
                if let Some(id) = cell.piece() {
                    let _ = occupied
                        .entry(id)
                        .or_default()
                        .insert(Coordinate::new(row_index, column_index));
                }
            }
        }

        let pieces = occupied
            .into_iter()
            .filter_map(|(id, cells)| Piece::new(id, cells).map(|piece| (id, piece)))
            .collect();

        Self {
            name: name.into(),
            description: description.into(),
            width,
            height,
            rows,
            pieces,
        }
    }

    /// Level name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Level description, empty when the catalog omits it.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Rows of cells in top-to-bottom order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Cell at the provided coordinate.
    ///
    /// Positions inside the `width` × `height` rectangle but past the end of a
    /// short row read as [`Cell::Empty`]; positions outside it yield `None`.
    #[must_use]
    pub fn cell_at(&self, coordinate: Coordinate) -> Option<Cell> {
        if coordinate.column() >= self.width || coordinate.row() >= self.height {
            return None;
        }

        let row = self.rows.get(usize::try_from(coordinate.row()).ok()?)?;
        let column = usize::try_from(coordinate.column()).ok()?;
        Some(row.get(column).copied().unwrap_or(Cell::Empty))
    }

    /// Every coordinate of the `width` × `height` rectangle in row-major order.
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> {
        let width = self.width;
        (0..self.height).flat_map(move |row| (0..width).map(move |column| Coordinate::new(row, column)))
    }

    /// Piece registered under the provided identifier.
    #[must_use]
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(&id)
    }

    /// Iterator over all pieces, heart first and then by symbol.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.values()
    }

    /// Number of registered pieces, the heart included.
    #[must_use]
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// The heart piece, if the board contains any `*` cell.
    #[must_use]
    pub fn heart_piece(&self) -> Option<&Piece> {
        self.piece(PieceId::Heart)
    }

    /// Piece covering the provided cell.
    #[must_use]
    pub fn piece_at(&self, coordinate: Coordinate) -> Option<&Piece> {
        self.cell_at(coordinate)
            .and_then(Cell::piece)
            .and_then(|id| self.piece(id))
    }

    /// Coordinates of all destination cells.
    #[must_use]
    pub fn destinations(&self) -> BTreeSet<Coordinate> {
        self.cells_matching(Cell::Destination)
    }

    /// Coordinates of all ordinary walls.
    #[must_use]
    pub fn walls(&self) -> BTreeSet<Coordinate> {
        self.cells_matching(Cell::Wall)
    }

    /// Coordinates of all one-way walls.
    #[must_use]
    pub fn one_way_walls(&self) -> BTreeSet<Coordinate> {
        self.cells_matching(Cell::OneWayWall)
    }

    fn cells_matching(&self, wanted: Cell) -> BTreeSet<Coordinate> {
        self.coordinates()
            .filter(|coordinate| self.cell_at(*coordinate) == Some(wanted))
            .collect()
    }
}

/// Malformed record boundaries detected while scanning catalog text.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum ScanError {
    /// A level header was not followed by any board row.
    #[error("level '{name}' (line {line}) has no board rows")]
    EmptyLevel {
        /// Name of the offending level.
        name: String,
        /// Line of the level header.
        line: usize,
    },
    /// A board row appeared before any level header.
    #[error("board row on line {line} does not belong to any level")]
    OrphanRow {
        /// Line of the orphaned row.
        line: usize,
    },
    /// A line opened a board row without a closing delimiter.
    #[error("line {line} opens a board row without a closing '@'")]
    UnmatchedDelimiter {
        /// Line of the malformed row.
        line: usize,
    },
    /// A description appeared after board rows or more than once.
    #[error("description on line {line} of level '{name}' must directly follow the header")]
    MisplacedDescription {
        /// Name of the level containing the description.
        name: String,
        /// Line of the misplaced description.
        line: usize,
    },
}

impl ScanError {
    /// Catalog line the error points at.
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::EmptyLevel { line, .. }
            | Self::OrphanRow { line }
            | Self::UnmatchedDelimiter { line }
            | Self::MisplacedDescription { line, .. } => *line,
        }
    }
}

/// Failure to convert a level record into a board.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum ParseError {
    /// A board row contains a character outside the symbol table.
    #[error("unknown symbol {symbol:?} at {coordinate}")]
    UnknownSymbol {
        /// The unrecognised character.
        symbol: char,
        /// Grid position of the character.
        coordinate: Coordinate,
    },
}

/// How serious a validation finding is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// Informational; the board remains usable.
    Warning,
    /// The board must not be used by any consumer.
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Fatal => write!(f, "fatal"),
        }
    }
}

/// Structural problems the validator can report.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueKind {
    /// A row is not exactly `width` cells long.
    RaggedRow {
        /// Index of the offending row.
        row: u32,
        /// Number of cells in the row.
        length: u32,
        /// Width of the board.
        width: u32,
    },
    /// A piece's cells are not 4-connected.
    DisconnectedPiece(PieceId),
    /// The board has no heart cell.
    MissingHeart,
    /// The board has no destination cell.
    NoDestination,
    /// No translation of the heart reaches the destinations while every other
    /// piece stays put.
    DestinationUnreachableStatic,
}

impl IssueKind {
    /// Severity implied by the kind of issue.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::DestinationUnreachableStatic => Severity::Warning,
            Self::RaggedRow { .. }
            | Self::DisconnectedPiece(_)
            | Self::MissingHeart
            | Self::NoDestination => Severity::Fatal,
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RaggedRow { row, length, width } => {
                write!(f, "row {row} has {length} cells but the board is {width} wide")
            }
            Self::DisconnectedPiece(id) => write!(f, "piece '{id}' is split into disjoint shapes"),
            Self::MissingHeart => write!(f, "board has no heart piece"),
            Self::NoDestination => write!(f, "board has no destination cell"),
            Self::DestinationUnreachableStatic => write!(
                f,
                "heart piece cannot reach the destination while the other pieces stay in place"
            ),
        }
    }
}

/// Single finding reported by the validator.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationIssue {
    kind: IssueKind,
    coordinates: Vec<Coordinate>,
}

impl ValidationIssue {
    /// Creates an issue without any associated cells.
    #[must_use]
    pub fn new(kind: IssueKind) -> Self {
        Self {
            kind,
            coordinates: Vec::new(),
        }
    }

    /// Creates an issue pointing at the offending cells.
    #[must_use]
    pub fn at(kind: IssueKind, coordinates: Vec<Coordinate>) -> Self {
        Self { kind, coordinates }
    }

    /// Kind of the issue.
    #[must_use]
    pub fn kind(&self) -> &IssueKind {
        &self.kind
    }

    /// Severity of the issue.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    /// Reports whether the issue makes the board unusable.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    /// Cells the issue points at; empty when the issue concerns the whole board.
    #[must_use]
    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity(), self.kind)?;
        if !self.coordinates.is_empty() {
            let cells = self
                .coordinates
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, " at {cells}")?;
        }
        Ok(())
    }
}
