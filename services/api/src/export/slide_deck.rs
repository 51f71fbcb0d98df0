//! services/api/src/export/slide_deck.rs
//!
//! Renders a lecture into PowerPoint bytes: an OOXML `.pptx` package written
//! with the `zip` crate. The static package parts (content types, master,
//! layout, theme) are fixed templates; only the slide parts are generated.
//!
//! Layout is intentionally fixed: a colored title slide, one content slide
//! per section, and a questions slide for sections that have questions
//! (first three questions, multiple-choice options inline).

use std::io::{Cursor, Write};
use zip::{write::SimpleFileOptions, ZipWriter};

use eduvisual_core::domain::Question;

use super::{ExportPayload, ExportSection};
use crate::error::ApiError;

// Fixed palette, shared with the HTML renderer.
const TITLE_BG: &str = "3B82F6";
const SECTION_BG: &str = "F3F4F6";
const QUESTIONS_BG: &str = "FFFFFF";
const HEADING_COLOR: &str = "1F2937";
const BODY_COLOR: &str = "374151";
const OPTION_COLOR: &str = "4B5563";
const SUBTITLE_COLOR: &str = "E0E7FF";

const QUESTIONS_PER_SLIDE: usize = 3;

/// English Metric Units per inch; the 10 x 7.5 inch layout of the deck.
const EMU_PER_INCH: f64 = 914_400.0;
const PAGE_CX: i64 = 9_144_000;
const PAGE_CY: i64 = 6_858_000;

fn emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH) as i64
}

/// Renders the complete `.pptx` package. The byte vector is only returned
/// once every part has been written, so a failure exports nothing.
pub fn render_slide_deck(payload: &ExportPayload) -> Result<Vec<u8>, ApiError> {
    let mut slides: Vec<String> = Vec::new();

    slides.push(title_slide_xml(payload));
    for section in &payload.sections {
        slides.push(content_slide_xml(section));
        if !section.questions.is_empty() {
            slides.push(questions_slide_xml(section));
        }
    }

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    let pack = |zip: &mut ZipWriter<Cursor<Vec<u8>>>, name: &str, body: &str| {
        zip.start_file(name, options)
            .and_then(|_| zip.write_all(body.as_bytes()).map_err(Into::into))
            .map_err(|e| ApiError::Export(format!("could not write {}: {}", name, e)))
    };

    pack(&mut zip, "[Content_Types].xml", &content_types_xml(slides.len()))?;
    pack(&mut zip, "_rels/.rels", ROOT_RELS)?;
    pack(&mut zip, "ppt/presentation.xml", &presentation_xml(slides.len()))?;
    pack(&mut zip, "ppt/_rels/presentation.xml.rels", &presentation_rels_xml(slides.len()))?;
    pack(&mut zip, "ppt/slideMasters/slideMaster1.xml", SLIDE_MASTER)?;
    pack(&mut zip, "ppt/slideMasters/_rels/slideMaster1.xml.rels", SLIDE_MASTER_RELS)?;
    pack(&mut zip, "ppt/slideLayouts/slideLayout1.xml", SLIDE_LAYOUT)?;
    pack(&mut zip, "ppt/slideLayouts/_rels/slideLayout1.xml.rels", SLIDE_LAYOUT_RELS)?;
    pack(&mut zip, "ppt/theme/theme1.xml", THEME)?;

    for (index, slide) in slides.iter().enumerate() {
        pack(&mut zip, &format!("ppt/slides/slide{}.xml", index + 1), slide)?;
        pack(
            &mut zip,
            &format!("ppt/slides/_rels/slide{}.xml.rels", index + 1),
            SLIDE_RELS,
        )?;
    }

    let cursor = zip
        .finish()
        .map_err(|e| ApiError::Export(format!("could not finish pptx package: {}", e)))?;
    Ok(cursor.into_inner())
}

//=========================================================================================
// Slide Generation
//=========================================================================================

fn title_slide_xml(payload: &ExportPayload) -> String {
    let title = payload.title.as_deref().unwrap_or("Lecture");
    let mut shapes = text_shape(
        2,
        emu(0.5),
        emu(2.5),
        emu(9.0),
        emu(1.5),
        &[run(title, 5400, true, "FFFFFF")],
        true,
    );
    if let Some(subtitle) = payload.subtitle.as_deref() {
        shapes.push_str(&text_shape(
            3,
            emu(0.5),
            emu(4.2),
            emu(9.0),
            emu(0.8),
            &[run(subtitle, 2400, false, SUBTITLE_COLOR)],
            true,
        ));
    }
    slide_xml(TITLE_BG, &shapes)
}

fn content_slide_xml(section: &ExportSection) -> String {
    let title = section.title.as_deref().unwrap_or("Section");
    let mut shapes = text_shape(
        2,
        emu(0.5),
        emu(1.0),
        emu(9.0),
        emu(1.0),
        &[run(title, 4000, true, HEADING_COLOR)],
        false,
    );
    if let Some(content) = section.content.as_deref() {
        let paragraphs: Vec<String> = content
            .lines()
            .map(|line| run(line, 1400, false, BODY_COLOR))
            .collect();
        shapes.push_str(&text_shape(
            3,
            emu(0.5),
            emu(2.2),
            emu(9.0),
            emu(4.5),
            &paragraphs,
            false,
        ));
    }
    slide_xml(SECTION_BG, &shapes)
}

fn questions_slide_xml(section: &ExportSection) -> String {
    let title = section.title.as_deref().unwrap_or("Section");
    let mut shapes = text_shape(
        2,
        emu(0.5),
        emu(0.5),
        emu(9.0),
        emu(0.6),
        &[run(&format!("{} - Questions", title), 2800, true, HEADING_COLOR)],
        false,
    );

    let mut y = 1.3;
    let mut shape_id = 3;
    for question in section.questions.iter().take(QUESTIONS_PER_SLIDE) {
        let mut paragraphs = vec![run(
            &format!("Q: {}", question.question()),
            1200,
            true,
            HEADING_COLOR,
        )];
        let mut height = 0.8;
        if let Question::MultipleChoice { options, .. } = question {
            for (key, value) in options {
                paragraphs.push(run(&format!("{}) {}", key, value), 1100, false, OPTION_COLOR));
                height += 0.5;
            }
        }
        shapes.push_str(&text_shape(
            shape_id,
            emu(0.7),
            emu(y),
            emu(8.6),
            emu(height),
            &paragraphs,
            false,
        ));
        shape_id += 1;
        y += height + 0.3;
    }

    slide_xml(QUESTIONS_BG, &shapes)
}

fn slide_xml(background: &str, shapes: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:bg><p:bgPr><a:solidFill><a:srgbClr val="{background}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>{shapes}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#
    )
}

/// One paragraph run: text at a font size (in hundredths of a point), bold
/// or not, in a solid color.
fn run(text: &str, size: u32, bold: bool, color: &str) -> String {
    let bold_attr = if bold { r#" b="1""# } else { "" };
    format!(
        r#"<a:p><a:r><a:rPr lang="en-US" sz="{size}"{bold_attr} dirty="0"><a:solidFill><a:srgbClr val="{color}"/></a:solidFill></a:rPr><a:t>{}</a:t></a:r></a:p>"#,
        escape_xml(text)
    )
}

fn text_shape(
    id: u32,
    x: i64,
    y: i64,
    cx: i64,
    cy: i64,
    paragraphs: &[String],
    centered: bool,
) -> String {
    let body: String = if centered {
        paragraphs
            .iter()
            .map(|p| p.replacen("<a:p>", r#"<a:p><a:pPr algn="ctr"/>"#, 1))
            .collect()
    } else {
        paragraphs.concat()
    };
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="TextBox {id}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr><p:txBody><a:bodyPr wrap="square"/><a:lstStyle/>{body}</p:txBody></p:sp>"#
    )
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

//=========================================================================================
// Package Plumbing
//=========================================================================================

fn content_types_xml(slide_count: usize) -> String {
    let mut overrides = String::new();
    for i in 1..=slide_count {
        overrides.push_str(&format!(
            r#"<Override PartName="/ppt/slides/slide{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/><Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>{overrides}</Types>"#
    )
}

fn presentation_xml(slide_count: usize) -> String {
    let mut slide_ids = String::new();
    for i in 0..slide_count {
        slide_ids.push_str(&format!(
            r#"<p:sldId id="{}" r:id="rId{}"/>"#,
            256 + i,
            i + 2
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>{slide_ids}</p:sldIdLst><p:sldSz cx="{PAGE_CX}" cy="{PAGE_CY}"/><p:notesSz cx="{PAGE_CY}" cy="{PAGE_CX}"/></p:presentation>"#
    )
}

fn presentation_rels_xml(slide_count: usize) -> String {
    let mut rels = String::from(
        r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/>"#,
    );
    for i in 0..slide_count {
        rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{}.xml"/>"#,
            i + 2,
            i + 1
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rels}</Relationships>"#
    )
}

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/></Relationships>"#;

const SLIDE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/></Relationships>"#;

const SLIDE_MASTER_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="../theme/theme1.xml"/></Relationships>"#;

const SLIDE_LAYOUT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="../slideMasters/slideMaster1.xml"/></Relationships>"#;

const SLIDE_MASTER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#;

const SLIDE_LAYOUT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="blank"><p:cSld name="Blank"><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#;

const THEME: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="EduVisual"><a:themeElements><a:clrScheme name="EduVisual"><a:dk1><a:srgbClr val="1F2937"/></a:dk1><a:lt1><a:srgbClr val="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="374151"/></a:dk2><a:lt2><a:srgbClr val="F3F4F6"/></a:lt2><a:accent1><a:srgbClr val="3B82F6"/></a:accent1><a:accent2><a:srgbClr val="8B5CF6"/></a:accent2><a:accent3><a:srgbClr val="10B981"/></a:accent3><a:accent4><a:srgbClr val="F59E0B"/></a:accent4><a:accent5><a:srgbClr val="EF4444"/></a:accent5><a:accent6><a:srgbClr val="6B7280"/></a:accent6><a:hlink><a:srgbClr val="3B82F6"/></a:hlink><a:folHlink><a:srgbClr val="8B5CF6"/></a:folHlink></a:clrScheme><a:fontScheme name="EduVisual"><a:majorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Office"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io::Read;

    fn read_archive(bytes: Vec<u8>) -> zip::ZipArchive<Cursor<Vec<u8>>> {
        zip::ZipArchive::new(Cursor::new(bytes)).expect("deck is a readable zip")
    }

    #[test]
    fn empty_payload_renders_a_single_title_slide() {
        let bytes = render_slide_deck(&ExportPayload::default()).unwrap();
        assert_eq!(&bytes[..2], b"PK");

        let mut archive = read_archive(bytes);
        assert!(archive.by_name("ppt/presentation.xml").is_ok());
        assert!(archive.by_name("ppt/slides/slide1.xml").is_ok());
        assert!(archive.by_name("ppt/slides/slide2.xml").is_err());
    }

    #[test]
    fn sections_with_questions_get_an_extra_slide() {
        let payload = ExportPayload {
            title: Some("Biology".to_string()),
            subtitle: None,
            sections: vec![
                ExportSection {
                    title: Some("Cells".to_string()),
                    content: Some("Cells are the unit of life.".to_string()),
                    questions: vec![Question::TrueFalse {
                        id: 1,
                        question: "Cells are alive.".to_string(),
                        correct_answer: "true".to_string(),
                        explanation: "They are.".to_string(),
                    }],
                },
                ExportSection {
                    title: Some("Tissues".to_string()),
                    content: None,
                    questions: vec![],
                },
            ],
        };

        // Title + (content + questions) + content = 4 slides.
        let mut archive = read_archive(render_slide_deck(&payload).unwrap());
        assert!(archive.by_name("ppt/slides/slide4.xml").is_ok());
        assert!(archive.by_name("ppt/slides/slide5.xml").is_err());
    }

    #[test]
    fn multiple_choice_options_are_listed_inline() {
        let payload = ExportPayload {
            title: None,
            subtitle: None,
            sections: vec![ExportSection {
                title: Some("Quiz".to_string()),
                content: None,
                questions: vec![Question::MultipleChoice {
                    id: 1,
                    question: "Pick one".to_string(),
                    options: BTreeMap::from([
                        ("a".to_string(), "first".to_string()),
                        ("b".to_string(), "second".to_string()),
                    ]),
                    correct_answer: "a".to_string(),
                    explanation: "".to_string(),
                }],
            }],
        };

        let mut archive = read_archive(render_slide_deck(&payload).unwrap());
        let mut xml = String::new();
        archive
            .by_name("ppt/slides/slide3.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        assert!(xml.contains("a) first"));
        assert!(xml.contains("b) second"));
    }

    #[test]
    fn titles_are_xml_escaped() {
        let payload = ExportPayload {
            title: Some("Cells & <Membranes>".to_string()),
            subtitle: None,
            sections: vec![],
        };
        let mut archive = read_archive(render_slide_deck(&payload).unwrap());
        let mut xml = String::new();
        archive
            .by_name("ppt/slides/slide1.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        assert!(xml.contains("Cells &amp; &lt;Membranes&gt;"));
    }
}
