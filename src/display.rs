use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::graph::RenderedFigure;

/// Destination for a finished figure.
pub trait Show {
    fn show(&mut self, figure: &RenderedFigure) -> Result<()>;
}

/// Writes each figure to a fixed path, replacing any previous one.
#[derive(Debug, Clone)]
pub struct SaveToFile {
    path: PathBuf,
}

impl SaveToFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Show for SaveToFile {
    fn show(&mut self, figure: &RenderedFigure) -> Result<()> {
        fs::write(&self.path, &figure.bytes)
            .with_context(|| format!("Failed to write figure to '{}'", self.path.display()))?;
        debug!(
            "Wrote {}x{} {:?} figure to {}",
            figure.width,
            figure.height,
            figure.format,
            self.path.display()
        );
        Ok(())
    }
}

/// Streams encoded figures to a writer such as stdout.
pub struct WriteTo<W: Write> {
    writer: W,
}

impl<W: Write> WriteTo<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Show for WriteTo<W> {
    fn show(&mut self, figure: &RenderedFigure) -> Result<()> {
        self.writer
            .write_all(&figure.bytes)
            .context("Failed to write figure")?;
        self.writer.flush().context("Failed to flush figure output")?;
        Ok(())
    }
}

/// Keeps figures in memory.
#[derive(Debug, Clone, Default)]
pub struct Collect {
    pub figures: Vec<RenderedFigure>,
}

impl Show for Collect {
    fn show(&mut self, figure: &RenderedFigure) -> Result<()> {
        self.figures.push(figure.clone());
        Ok(())
    }
}
