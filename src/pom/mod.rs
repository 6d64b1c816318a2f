//! Maven POM configuration
//!
//! Replaces any JaCoCo plugin declaration in a `pom.xml` with the canonical
//! one, so that the build produces `target/site/jacoco/jacoco.xml`.

use crate::error::{Error, Result};
use crate::util;
use crate::xml::{Document, Element, Node};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const JACOCO_ARTIFACT_ID: &str = "jacoco-maven-plugin";
pub const JACOCO_VERSION: &str = "0.8.4";

const JACOCO_CONFIG: &str = r#"<plugin>
    <groupId>org.jacoco</groupId>
    <artifactId>jacoco-maven-plugin</artifactId>
    <version>0.8.4</version>
    <executions>
        <execution>
            <id>default-prepare-agent</id>
            <goals>
                <goal>prepare-agent</goal>
            </goals>
        </execution>
        <execution>
            <id>prepare-xml-report</id>
            <goals>
                <goal>report</goal>
            </goals>
            <phase>verify</phase>
        </execution>
    </executions>
</plugin>"#;

/// Added to the closing indentation of `<plugins>` when it has no other
/// element child to copy the indentation from
const INDENT_UNIT: &str = "    ";

/// Configures a `pom.xml` to create the JaCoCo coverage report
#[derive(Debug, Clone)]
pub struct PomConfigurator {
    pom_path: PathBuf,
}

impl PomConfigurator {
    pub fn new(pom_path: impl Into<PathBuf>) -> Self {
        Self {
            pom_path: pom_path.into(),
        }
    }

    pub fn pom_path(&self) -> &Path {
        &self.pom_path
    }

    /// Load, rewrite, back up and overwrite the POM
    pub fn configure_pom(&self) -> Result<()> {
        let file = File::open(&self.pom_path)?;
        let mut pom = Document::load(file)?;

        configure_jacoco(&mut pom)?;

        util::backup(&self.pom_path)?;
        let out = File::create(&self.pom_path).map_err(|source| Error::WriteFailure {
            path: self.pom_path.clone(),
            source,
        })?;
        let count = pom.write(BufWriter::new(out))?;
        debug!("written {} bytes to '{}'", count, self.pom_path.display());
        info!("configured JaCoCo in '{}'", self.pom_path.display());
        Ok(())
    }
}

/// Replace any existing JaCoCo plugin block with the canonical one
///
/// Running this twice yields the same document as running it once.
pub fn configure_jacoco(pom: &mut Document) -> Result<()> {
    unlink_existing_jacoco_config(pom.root_mut());

    let anchor = pom
        .root()
        .descendant_paths("plugins")
        .into_iter()
        .next()
        .ok_or_else(|| Error::AnchorNotFound("plugins".to_string()))?;
    let plugins = pom
        .root_mut()
        .element_at_mut(&anchor)
        .ok_or_else(|| Error::AnchorNotFound("plugins".to_string()))?;

    append_plugin(plugins, jacoco_plugin_config()?);
    Ok(())
}

/// Whether `plugin` declares the JaCoCo Maven plugin
pub fn is_jacoco_plugin(plugin: &Element) -> bool {
    plugin
        .child("artifactId")
        .map(|id| id.text().trim() == JACOCO_ARTIFACT_ID)
        .unwrap_or(false)
}

/// Number of JaCoCo plugin blocks anywhere in the document
pub fn count_jacoco_plugins(pom: &Document) -> usize {
    pom.root()
        .descendant_paths("plugin")
        .iter()
        .filter_map(|path| pom.root().element_at(path))
        .filter(|plugin| is_jacoco_plugin(plugin))
        .count()
}

fn unlink_existing_jacoco_config(root: &mut Element) -> usize {
    let matches: Vec<_> = root
        .descendant_paths("plugin")
        .into_iter()
        .filter(|path| root.element_at(path).map(is_jacoco_plugin).unwrap_or(false))
        .collect();

    // Back to front, so earlier paths stay valid while later siblings go.
    for path in matches.iter().rev() {
        info!("replacing existing JaCoCo config in pom.xml");
        let Some((&index, parent_path)) = path.split_last() else {
            continue;
        };
        let Some(parent) = root.element_at_mut(parent_path) else {
            continue;
        };
        let children = parent.children_mut();
        children.remove(index);
        if index > 0 && children[index - 1].is_whitespace() {
            children.remove(index - 1);
        }
    }
    matches.len()
}

fn jacoco_plugin_config() -> Result<Element> {
    Ok(Document::from_str(JACOCO_CONFIG)?.into_root())
}

/// Append `plugin` as the last element child of `plugins`, indented like
/// its siblings and placed before the closing whitespace
fn append_plugin(plugins: &mut Element, mut plugin: Element) {
    let children = plugins.children();
    let closing = children
        .last()
        .filter(|node| node.is_whitespace())
        .and_then(Node::raw_text)
        .map(|raw| raw.into_owned());
    let sibling_indent = children
        .iter()
        .position(|node| node.as_element().is_some())
        .filter(|&first| first > 0 && children[first - 1].is_whitespace())
        .and_then(|first| children[first - 1].raw_text())
        .map(|raw| raw.into_owned());
    let indent = sibling_indent.or_else(|| closing.as_ref().map(|c| format!("{}{}", c, INDENT_UNIT)));

    let mut at = if closing.is_some() {
        children.len() - 1
    } else {
        children.len()
    };

    if let Some(indent) = indent {
        let line_ending = if indent.contains("\r\n") { "\r\n" } else { "\n" };
        let line_indent = indent.rsplit('\n').next().unwrap_or_default().to_string();
        plugin.reindent(line_ending, &line_indent);
        plugins.insert(at, Node::text(indent));
        at += 1;
    }
    plugins.insert(at, Node::Element(plugin));
}
