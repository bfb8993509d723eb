use anyhow::{anyhow, Result};
use serde::Serialize;
use std::{io::Write, str::FromStr};

use crate::{
    clock::{format_daylight, format_offset, format_time, LocalSolarTimes},
    fuel::FuelInput,
    location::GeoCoordinate,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Hex(String),
    White,
    Yellow,
    Gray,
    LightGray,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Weight {
    Regular,
    Medium,
    Semibold,
    Bold,
    Heavy,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Font {
    pub weight: Weight,
    pub size: u32,
}

impl Font {
    pub const BODY: Font = Font {
        weight: Weight::Regular,
        size: 14,
    };
    pub fn new(weight: Weight, size: u32) -> Self {
        Self { weight, size }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    Solid(Color),
    Gradient {
        colors: Vec<Color>,
        locations: Vec<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Text {
        text: String,
        font: Font,
        color: Color,
        align: Align,
    },
    Spacer {
        size: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Widget {
    pub background: Background,
    pub padding: u32,
    pub elements: Vec<Element>,
}

#[derive(Debug)]
pub struct WidgetBuilder {
    widget: Widget,
}

impl WidgetBuilder {
    pub fn new(background: Background) -> Self {
        Self {
            widget: Widget {
                background,
                padding: 0,
                elements: Vec::new(),
            },
        }
    }
    pub fn padding(mut self, padding: u32) -> Self {
        self.widget.padding = padding;
        self
    }
    pub fn text(self, text: impl Into<String>, font: Font, color: Color) -> Self {
        self.element(Element::Text {
            text: text.into(),
            font,
            color,
            align: Align::Left,
        })
    }
    pub fn centered_text(self, text: impl Into<String>, font: Font, color: Color) -> Self {
        self.element(Element::Text {
            text: text.into(),
            font,
            color,
            align: Align::Center,
        })
    }
    pub fn spacer(self, size: u32) -> Self {
        self.element(Element::Spacer { size })
    }
    fn element(mut self, element: Element) -> Self {
        self.widget.elements.push(element);
        self
    }
    pub fn build(self) -> Widget {
        self.widget
    }
}

/// Sunrise, sunset and daylight duration for the current position.
pub fn daylight_widget(
    times: &LocalSolarTimes,
    position: &GeoCoordinate,
    utc_offset: f64,
) -> Widget {
    WidgetBuilder::new(Background::Solid(Color::Hex("#222222".to_string())))
        .text("Sonnenzeiten", Font::new(Weight::Bold, 18), Color::Yellow)
        .spacer(8)
        .text(
            format!("🌅 Sonnenaufgang: {}", format_time(times.sunrise)),
            Font::BODY,
            Color::White,
        )
        .text(
            format!("🌇 Sonnenuntergang: {}", format_time(times.sunset)),
            Font::BODY,
            Color::White,
        )
        .spacer(8)
        .text(
            format!("🌞 Tageslichtdauer: {}", format_daylight(times.daylight())),
            Font::BODY,
            Color::Yellow,
        )
        .spacer(8)
        .text(
            format!("📍 {} | TZ: {}", position, format_offset(utc_offset)),
            Font::BODY,
            Color::Gray,
        )
        .build()
}

/// Consumption and price of the last fill up.
pub fn fuel_widget(input: &FuelInput, entered: &str) -> Widget {
    WidgetBuilder::new(Background::Gradient {
        colors: vec![
            Color::Hex("#43cea2".to_string()),
            Color::Hex("#185a9d".to_string()),
        ],
        locations: vec![0.0, 1.0],
    })
    .padding(10)
    .centered_text("⛽️", Font::new(Weight::Heavy, 34), Color::White)
    .spacer(8)
    .centered_text(
        format!("{} l", input.consumption_text()),
        Font::new(Weight::Semibold, 28),
        Color::White,
    )
    .spacer(4)
    .centered_text(
        format!("Preis: {} €/l", input.price),
        Font::new(Weight::Semibold, 16),
        Color::White,
    )
    .spacer(6)
    .centered_text(entered, Font::new(Weight::Medium, 14), Color::LightGray)
    .build()
}

pub trait Render {
    fn render(&mut self, widget: &Widget) -> Result<()>;
}

/// Writes each text on its own line and each spacer as an empty line.
#[derive(Debug)]
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Render for TextRenderer<W> {
    fn render(&mut self, widget: &Widget) -> Result<()> {
        for element in &widget.elements {
            match element {
                Element::Text { text, .. } => writeln!(self.out, "{}", text)?,
                Element::Spacer { .. } => writeln!(self.out)?,
            }
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Writes the widget description as pretty printed JSON.
#[derive(Debug)]
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Render for JsonRenderer<W> {
    fn render(&mut self, widget: &Widget) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, widget)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

impl FromStr for Format {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "text" => Ok(Format::Text),
            "json" => Ok(Format::Json),
            _ => Err(anyhow!("unknown format {:?}, expected text or json", s)),
        }
    }
}

pub fn renderer<'a, W: Write + 'a>(format: Format, out: W) -> Box<dyn Render + 'a> {
    match format {
        Format::Text => Box::new(TextRenderer::new(out)),
        Format::Json => Box::new(JsonRenderer::new(out)),
    }
}
