//! Static completion catalogs for the D2 language.
//!
//! Plain data tables: shape values, style properties, keywords, directions,
//! arrowheads, connection operators, named colors, booleans, special content
//! blocks, and multi-word phrase suggestions. Insert templates may carry a
//! single `$0` cursor placeholder, left verbatim for the host's own template
//! expansion.

use lsp_types::CompletionItemKind;

/// One static catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct CatalogItem {
    pub label: &'static str,
    pub kind: CompletionItemKind,
    pub detail: &'static str,
    pub documentation: &'static str,
    pub insert_text: Option<&'static str>,
    pub sort_text: &'static str,
}

const fn item(
    label: &'static str,
    kind: CompletionItemKind,
    detail: &'static str,
    documentation: &'static str,
    sort_text: &'static str,
) -> CatalogItem {
    CatalogItem {
        label,
        kind,
        detail,
        documentation,
        insert_text: None,
        sort_text,
    }
}

const fn insert(mut base: CatalogItem, text: &'static str) -> CatalogItem {
    base.insert_text = Some(text);
    base
}

pub const SHAPES: &[CatalogItem] = &[
    item("square", CompletionItemKind::VALUE, "[Shape]", "A square shape", "0001"),
    item("rectangle", CompletionItemKind::VALUE, "[Shape]", "A rectangle shape", "0002"),
    item("circle", CompletionItemKind::VALUE, "[Shape]", "A circular shape", "0003"),
    item("oval", CompletionItemKind::VALUE, "[Shape]", "An oval shape", "0004"),
    item("diamond", CompletionItemKind::VALUE, "[Shape]", "A diamond/rhombus shape", "0005"),
    item("parallelogram", CompletionItemKind::VALUE, "[Shape]", "A parallelogram shape", "0006"),
    item("hexagon", CompletionItemKind::VALUE, "[Shape]", "A hexagonal shape", "0007"),
    item("cloud", CompletionItemKind::VALUE, "[Shape]", "A cloud shape", "0008"),
    item("cylinder", CompletionItemKind::VALUE, "[Shape]", "A cylindrical shape", "0009"),
    item("queue", CompletionItemKind::VALUE, "[Shape]", "A queue shape", "0010"),
    item("package", CompletionItemKind::VALUE, "[Shape]", "A package shape", "0011"),
    item("step", CompletionItemKind::VALUE, "[Shape]", "A step shape", "0012"),
    item("callout", CompletionItemKind::VALUE, "[Shape]", "A callout bubble shape", "0013"),
    item("stored_data", CompletionItemKind::VALUE, "[Shape]", "A stored data shape", "0014"),
    item("person", CompletionItemKind::VALUE, "[Shape]", "A person/actor shape", "0015"),
    item("text", CompletionItemKind::VALUE, "[Shape]", "A text-only shape with no border", "0016"),
    item("code", CompletionItemKind::VALUE, "[Shape]", "A code block shape", "0017"),
    item("sql_table", CompletionItemKind::VALUE, "[Shape]", "A SQL table shape", "0018"),
    item("class", CompletionItemKind::VALUE, "[Shape]", "A UML class shape", "0019"),
    item("sequence_diagram", CompletionItemKind::VALUE, "[Shape]", "A sequence diagram container", "0020"),
];

pub const STYLE_PROPERTIES: &[CatalogItem] = &[
    insert(item("fill", CompletionItemKind::PROPERTY, "[Style Property]", "Sets the background color of a shape", "0101"), "fill: "),
    insert(item("stroke", CompletionItemKind::PROPERTY, "[Style Property]", "Sets the border color", "0102"), "stroke: "),
    insert(item("stroke-width", CompletionItemKind::PROPERTY, "[Style Property]", "Sets the border width", "0103"), "stroke-width: "),
    insert(item("stroke-dash", CompletionItemKind::PROPERTY, "[Style Property]", "Sets the border dash pattern", "0104"), "stroke-dash: "),
    insert(item("opacity", CompletionItemKind::PROPERTY, "[Style Property]", "Sets the transparency (0-1)", "0105"), "opacity: "),
    insert(item("shadow", CompletionItemKind::PROPERTY, "[Style Property]", "Adds shadow to the shape", "0106"), "shadow: true"),
    insert(item("border-radius", CompletionItemKind::PROPERTY, "[Style Property]", "Sets rounded corners", "0107"), "border-radius: "),
    insert(item("font-size", CompletionItemKind::PROPERTY, "[Style Property]", "Sets the text font size", "0108"), "font-size: "),
    insert(item("font-color", CompletionItemKind::PROPERTY, "[Style Property]", "Sets the text color", "0109"), "font-color: "),
    insert(item("bold", CompletionItemKind::PROPERTY, "[Style Property]", "Makes text bold", "0110"), "bold: true"),
    insert(item("italic", CompletionItemKind::PROPERTY, "[Style Property]", "Makes text italic", "0111"), "italic: true"),
    insert(item("underline", CompletionItemKind::PROPERTY, "[Style Property]", "Underlines text", "0112"), "underline: true"),
    insert(item("3d", CompletionItemKind::PROPERTY, "[Style Property]", "Adds 3D effect to rectangles/squares", "0113"), "3d: true"),
    insert(item("multiple", CompletionItemKind::PROPERTY, "[Style Property]", "Shows multiple stacked shapes", "0114"), "multiple: true"),
    insert(item("double-border", CompletionItemKind::PROPERTY, "[Style Property]", "Adds double border to shape", "0115"), "double-border: true"),
    insert(item("animated", CompletionItemKind::PROPERTY, "[Style Property]", "Animates connections", "0116"), "animated: true"),
    insert(item("filled", CompletionItemKind::PROPERTY, "[Style Property]", "Whether the shape is filled", "0117"), "filled: true"),
    insert(item("width", CompletionItemKind::PROPERTY, "[Style Property]", "Sets the shape width", "0118"), "width: "),
    insert(item("height", CompletionItemKind::PROPERTY, "[Style Property]", "Sets the shape height", "0119"), "height: "),
];

pub const KEYWORDS: &[CatalogItem] = &[
    insert(item("shape", CompletionItemKind::KEYWORD, "[Keyword]", "Defines the shape type", "0201"), "shape: "),
    insert(item("style", CompletionItemKind::KEYWORD, "[Keyword]", "Groups style properties", "0202"), "style: {\n\t$0\n}"),
    insert(item("icon", CompletionItemKind::KEYWORD, "[Keyword]", "Sets an icon for the shape", "0203"), "icon: "),
    insert(item("near", CompletionItemKind::KEYWORD, "[Keyword]", "Positions shape near another", "0204"), "near: "),
    insert(item("tooltip", CompletionItemKind::KEYWORD, "[Keyword]", "Adds tooltip text", "0205"), "tooltip: "),
    insert(item("link", CompletionItemKind::KEYWORD, "[Keyword]", "Makes shape clickable with URL", "0206"), "link: "),
    insert(item("label", CompletionItemKind::KEYWORD, "[Keyword]", "Sets the label text", "0207"), "label: "),
    insert(item("direction", CompletionItemKind::KEYWORD, "[Keyword]", "Sets layout direction", "0208"), "direction: "),
    insert(item("constraint", CompletionItemKind::KEYWORD, "[Keyword]", "Adds layout constraints", "0209"), "constraint: "),
    insert(item("classes", CompletionItemKind::KEYWORD, "[Keyword]", "Defines reusable style classes", "0210"), "classes: {\n\t$0\n}"),
    insert(item("vars", CompletionItemKind::KEYWORD, "[Keyword]", "Defines variables", "0211"), "vars: {\n\t$0\n}"),
    insert(item("scenarios", CompletionItemKind::KEYWORD, "[Keyword]", "Defines diagram scenarios", "0212"), "scenarios: {\n\t$0\n}"),
    insert(item("layers", CompletionItemKind::KEYWORD, "[Keyword]", "Defines diagram layers", "0213"), "layers: {\n\t$0\n}"),
    insert(item("grid-rows", CompletionItemKind::KEYWORD, "[Keyword]", "Sets grid rows", "0214"), "grid-rows: "),
    insert(item("grid-columns", CompletionItemKind::KEYWORD, "[Keyword]", "Sets grid columns", "0215"), "grid-columns: "),
    insert(item("grid-gap", CompletionItemKind::KEYWORD, "[Keyword]", "Sets grid gap", "0216"), "grid-gap: "),
    insert(item("source-arrowhead", CompletionItemKind::KEYWORD, "[Keyword]", "Sets arrowhead at connection source", "0217"), "source-arrowhead: "),
    insert(item("target-arrowhead", CompletionItemKind::KEYWORD, "[Keyword]", "Sets arrowhead at connection target", "0218"), "target-arrowhead: "),
];

pub const DIRECTIONS: &[CatalogItem] = &[
    item("up", CompletionItemKind::VALUE, "[Direction]", "Layout flows upward", "0301"),
    item("down", CompletionItemKind::VALUE, "[Direction]", "Layout flows downward", "0302"),
    item("left", CompletionItemKind::VALUE, "[Direction]", "Layout flows leftward", "0303"),
    item("right", CompletionItemKind::VALUE, "[Direction]", "Layout flows rightward", "0304"),
];

pub const ARROWHEADS: &[CatalogItem] = &[
    item("triangle", CompletionItemKind::VALUE, "[Arrowhead]", "Triangle arrowhead", "0401"),
    item("diamond", CompletionItemKind::VALUE, "[Arrowhead]", "Diamond arrowhead", "0402"),
    item("circle", CompletionItemKind::VALUE, "[Arrowhead]", "Circle arrowhead", "0403"),
    item("cf-one", CompletionItemKind::VALUE, "[Arrowhead]", "Crow's foot: one", "0404"),
    item("cf-one-required", CompletionItemKind::VALUE, "[Arrowhead]", "Crow's foot: one required", "0405"),
    item("cf-many", CompletionItemKind::VALUE, "[Arrowhead]", "Crow's foot: many", "0406"),
    item("cf-many-required", CompletionItemKind::VALUE, "[Arrowhead]", "Crow's foot: many required", "0407"),
    item("diamond-filled", CompletionItemKind::VALUE, "[Arrowhead]", "Filled diamond arrowhead", "0408"),
    item("circle-filled", CompletionItemKind::VALUE, "[Arrowhead]", "Filled circle arrowhead", "0409"),
];

pub const CONNECTION_OPERATORS: &[CatalogItem] = &[
    insert(item("->", CompletionItemKind::OPERATOR, "[Connection]", "Directed connection (arrow)", "0501"), "-> "),
    insert(item("<-", CompletionItemKind::OPERATOR, "[Connection]", "Reverse directed connection", "0502"), "<- "),
    insert(item("<->", CompletionItemKind::OPERATOR, "[Connection]", "Bidirectional connection", "0503"), "<-> "),
    insert(item("--", CompletionItemKind::OPERATOR, "[Connection]", "Undirected connection (line)", "0504"), "-- "),
];

pub const COLORS: &[CatalogItem] = &[
    item("red", CompletionItemKind::COLOR, "[Color]", "Red color", "0601"),
    item("blue", CompletionItemKind::COLOR, "[Color]", "Blue color", "0602"),
    item("green", CompletionItemKind::COLOR, "[Color]", "Green color", "0603"),
    item("yellow", CompletionItemKind::COLOR, "[Color]", "Yellow color", "0604"),
    item("orange", CompletionItemKind::COLOR, "[Color]", "Orange color", "0605"),
    item("purple", CompletionItemKind::COLOR, "[Color]", "Purple color", "0606"),
    item("black", CompletionItemKind::COLOR, "[Color]", "Black color", "0607"),
    item("white", CompletionItemKind::COLOR, "[Color]", "White color", "0608"),
    item("gray", CompletionItemKind::COLOR, "[Color]", "Gray color", "0609"),
    item("transparent", CompletionItemKind::COLOR, "[Color]", "Transparent (no fill)", "0610"),
];

pub const BOOLEANS: &[CatalogItem] = &[
    item("true", CompletionItemKind::VALUE, "[Boolean]", "Boolean true value", "0701"),
    item("false", CompletionItemKind::VALUE, "[Boolean]", "Boolean false value", "0702"),
];

pub const SPECIAL_BLOCKS: &[CatalogItem] = &[
    insert(item("md", CompletionItemKind::SNIPPET, "[Markdown Block]", "Markdown content block", "0801"), "|md\n$0\n|"),
    insert(item("latex", CompletionItemKind::SNIPPET, "[LaTeX Block]", "LaTeX content block", "0802"), "|latex\n$0\n|"),
    insert(item("code", CompletionItemKind::SNIPPET, "[Code Block]", "Code content block", "0803"), "|`\n$0\n`|"),
];

pub const MULTI_WORD_PHRASES: &[CatalogItem] = &[
    item("database server", CompletionItemKind::TEXT, "[Multi-word Shape]", "Database server shape", "0901"),
    item("web server", CompletionItemKind::TEXT, "[Multi-word Shape]", "Web server shape", "0902"),
    item("load balancer", CompletionItemKind::TEXT, "[Multi-word Shape]", "Load balancer shape", "0903"),
    item("user interface", CompletionItemKind::TEXT, "[Multi-word Shape]", "User interface shape", "0904"),
    item("mobile app", CompletionItemKind::TEXT, "[Multi-word Shape]", "Mobile app shape", "0905"),
    item("api gateway", CompletionItemKind::TEXT, "[Multi-word Shape]", "API gateway shape", "0906"),
    item("message queue", CompletionItemKind::TEXT, "[Multi-word Shape]", "Message queue shape", "0907"),
    item("external service", CompletionItemKind::TEXT, "[Multi-word Shape]", "External service shape", "0908"),
];

/// Style properties whose values are booleans.
pub const BOOLEAN_PROPERTIES: &[&str] = &[
    "shadow", "bold", "italic", "underline", "3d", "multiple", "animated",
    "filled", "double-border",
];

/// Catalog entries appropriate after `property:`. Dispatches on the property
/// name; an unknown property falls back to keywords, operators, and phrases.
pub fn items_for_property(property: &str, in_style: bool) -> Vec<&'static CatalogItem> {
    let mut items: Vec<&'static CatalogItem> = Vec::new();

    if in_style || property == "style" {
        items.extend(STYLE_PROPERTIES);
    }
    if property == "shape" {
        items.extend(SHAPES);
    }
    if property == "direction" {
        items.extend(DIRECTIONS);
    }
    if property.contains("arrowhead") {
        items.extend(ARROWHEADS);
    }
    if matches!(property, "fill" | "stroke" | "font-color") {
        items.extend(COLORS);
    }
    if BOOLEAN_PROPERTIES.contains(&property) {
        items.extend(BOOLEANS);
    }

    if items.is_empty() {
        items.extend(KEYWORDS);
        items.extend(CONNECTION_OPERATORS);
        items.extend(MULTI_WORD_PHRASES);
    }
    items
}
