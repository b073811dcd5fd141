//! Hover documentation lookup.
//!
//! A static markdown table covers language elements (shapes, style
//! properties, keywords, operators); shapes defined in the current document
//! get a dynamically composed entry. Unknown words are simply "not found".

use lsp_types::{Hover, HoverContents, MarkupContent, MarkupKind};
use tracing::debug;

use crate::analysis::collect_shapes;
use crate::parser::ParseContext;

/// Documentation for the word at `offset`, or `None`.
pub fn hover(text: &str, offset: usize, parse: &ParseContext) -> Option<Hover> {
    let word = word_at(text, offset)?;
    debug!(word = %word, "hover lookup");

    let value = static_documentation(&word)
        .map(str::to_string)
        .or_else(|| shape_documentation(&word, parse))?;

    Some(Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value,
        }),
        range: None,
    })
}

/// The identifier-like word under the cursor, or the operator run when the
/// cursor sits on connection punctuation.
fn word_at(text: &str, offset: usize) -> Option<String> {
    let mut offset = offset.min(text.len());
    while offset > 0 && !text.is_char_boundary(offset) {
        offset -= 1;
    }

    let is_word = |c: char| c.is_alphanumeric() || c == '_' || c == '-';
    let is_operator = |c: char| matches!(c, '-' | '<' | '>');

    let extract = |pred: &dyn Fn(char) -> bool| -> Option<String> {
        let start = text[..offset]
            .char_indices()
            .rev()
            .take_while(|(_, c)| pred(*c))
            .last()
            .map(|(i, _)| i)
            .unwrap_or(offset);
        let end = text[offset..]
            .char_indices()
            .take_while(|(_, c)| pred(*c))
            .last()
            .map(|(i, c)| offset + i + c.len_utf8())
            .unwrap_or(offset);
        (start < end).then(|| text[start..end].to_string())
    };

    // A run of bare '-' is connection punctuation, not an identifier.
    if let Some(word) = extract(&is_word) {
        if word.chars().any(char::is_alphanumeric) {
            return Some(word);
        }
    }
    extract(&is_operator)
}

/// Dynamic entry for a shape defined in the current document.
fn shape_documentation(word: &str, parse: &ParseContext) -> Option<String> {
    let all = collect_shapes(&parse.shapes);
    let (path, shape) = all
        .iter()
        .find(|(_, shape)| shape.identifier == word)?;

    let child_count = shape.child_shapes().count();
    let connection_count = parse
        .connections
        .iter()
        .filter(|c| {
            c.source == shape.identifier
                || c.target == shape.identifier
                || c.source == *path
                || c.target == *path
        })
        .count();

    let mut doc = format!("**{}** - Shape defined in this document\n\nPath: `{path}`", shape.identifier);
    if let Some(kind) = shape.attributes.get("shape") {
        doc.push_str(&format!("\n\nShape type: `{kind}`"));
    }
    doc.push_str(&format!(
        "\n\nChildren: {child_count} · Connections: {connection_count}"
    ));
    Some(doc)
}

fn static_documentation(word: &str) -> Option<&'static str> {
    let doc = match word.to_lowercase().as_str() {
        // Core elements
        "shape" => "**shape** - Defines the visual representation of a node\n\nCommon shapes: `square`, `circle`, `cylinder`, `cloud`",
        "style" => "**style** - Groups visual properties\n\nExample:\n```d2\nstyle: {\n  fill: blue\n  stroke: red\n}\n```",
        "->" => "**->** - Directed connection\n\nCreates an arrow from source to target",
        "<->" => "**<->** - Bidirectional connection\n\nCreates arrows in both directions",

        // Shapes
        "square" => "**square** - Basic square shape\n\n```d2\nbox.shape: square\n```",
        "rectangle" => "**rectangle** - Rectangular shape (default)\n\n```d2\nbox.shape: rectangle\n```",
        "circle" => "**circle** - Circular shape\n\n```d2\nnode.shape: circle\n```",
        "oval" => "**oval** - Elliptical shape\n\n```d2\nnode.shape: oval\n```",
        "diamond" => "**diamond** - Diamond/rhombus shape\n\n```d2\ndecision.shape: diamond\n```",
        "hexagon" => "**hexagon** - Six-sided shape\n\n```d2\nservice.shape: hexagon\n```",
        "cloud" => "**cloud** - Cloud shape for external services\n\n```d2\nexternal.shape: cloud\n```",
        "cylinder" => "**cylinder** - Database/storage shape\n\n```d2\ndb.shape: cylinder\n```",
        "person" => "**person** - Actor/user shape\n\n```d2\nuser.shape: person\n```",

        // Style properties
        "fill" => "**fill** - Background color\n\nSets the fill color of a shape.\n\n```d2\nbox.style.fill: blue\n```\n\nSupports:\n- Named colors: `red`, `blue`, `green`\n- Hex colors: `#FF0000`\n- `transparent` for no fill",
        "stroke" => "**stroke** - Border color\n\nSets the border color.\n\n```d2\nbox.style.stroke: black\n```",
        "stroke-width" => "**stroke-width** - Border thickness\n\nSets border width in pixels.\n\n```d2\nbox.style.stroke-width: 2\n```",
        "opacity" => "**opacity** - Transparency\n\nSets element transparency (0-1).\n\n```d2\nbox.style.opacity: 0.8\n```",
        "shadow" => "**shadow** - Drop shadow\n\nAdds shadow effect.\n\n```d2\nbox.style.shadow: true\n```",

        // Keywords
        "direction" => "**direction** - Layout direction\n\nControls diagram flow direction.\n\n```d2\ndirection: right\n```\n\nOptions: `up`, `down`, `left`, `right`",
        "near" => "**near** - Relative positioning\n\nPositions shape near another.\n\n```d2\nlabel.near: box\n```",
        "icon" => "**icon** - Shape icon\n\nAdds icon to shape.\n\n```d2\nserver.icon: https://icons.terrastruct.com/aws/compute/EC2.svg\n```",
        "vars" => "**vars** - Variables\n\nDefines reusable variables.\n\n```d2\nvars: {\n  primary-color: \"#2563eb\"\n}\nbox.style.fill: ${primary-color}\n```",
        "classes" => "**classes** - Style classes\n\nDefines reusable style classes.\n\n```d2\nclasses: {\n  important: {\n    style.fill: red\n    style.bold: true\n  }\n}\nbox.class: important\n```",
        _ => return None,
    };
    Some(doc)
}
