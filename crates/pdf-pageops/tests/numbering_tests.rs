mod common;

use common::*;
use pdf_pageops::*;

#[test]
fn test_roman_labels_skip_first_page() {
    let options = PageNumberOptions {
        format: NumberFormat::Roman,
        start_number: 1,
        skip_first: true,
        ..Default::default()
    };
    assert_eq!(
        options.labels(4),
        vec![
            None,
            Some("i".to_string()),
            Some("ii".to_string()),
            Some("iii".to_string())
        ]
    );
}

#[test]
fn test_roman_labels_without_skipping() {
    let options = PageNumberOptions {
        format: NumberFormat::Roman,
        ..Default::default()
    };
    assert_eq!(
        options.labels(4),
        vec![
            Some("i".to_string()),
            Some("ii".to_string()),
            Some("iii".to_string()),
            Some("iv".to_string())
        ]
    );
}

#[test]
fn test_skip_last_and_affixes() {
    let options = PageNumberOptions {
        start_number: 5,
        skip_last: true,
        prefix: "- ".to_string(),
        suffix: " -".to_string(),
        ..Default::default()
    };
    assert_eq!(
        options.labels(3),
        vec![Some("- 5 -".to_string()), Some("- 6 -".to_string()), None]
    );
}

#[test]
fn test_single_page_skipped_both_ways() {
    let options = PageNumberOptions {
        skip_first: true,
        skip_last: true,
        ..Default::default()
    };
    assert_eq!(options.labels(1), vec![None]);
}

#[test]
fn test_letter_labels() {
    let options = PageNumberOptions {
        format: NumberFormat::Letter,
        start_number: 25,
        ..Default::default()
    };
    let labels: Vec<_> = options.labels(4).into_iter().flatten().collect();
    assert_eq!(labels, vec!["y", "z", "aa", "ab"]);
}

#[test]
fn test_custom_template_with_total() {
    let options = PageNumberOptions {
        format: NumberFormat::Custom("Page {n} of {total}".to_string()),
        ..Default::default()
    };
    assert_eq!(options.labels(2)[1].as_deref(), Some("Page 2 of 2"));
}

#[test]
fn test_format_number() {
    assert_eq!(format_number(12, &NumberFormat::Arabic, 20), "12");
    assert_eq!(format_number(12, &NumberFormat::Roman, 20), "xii");
    assert_eq!(format_number(3, &NumberFormat::Letter, 20), "c");
}

#[test]
fn test_page_numbers_drawn_on_pages() {
    let doc = create_test_pdf(4);
    let options = PageNumberOptions {
        format: NumberFormat::Roman,
        skip_first: true,
        ..Default::default()
    };

    let produced = Operation::PageNumbers(options)
        .apply(vec![doc], None, &mut NoProgress)
        .unwrap();
    assert_eq!(produced.len(), 1);
    let doc = round_trip(produced.into_iter().next().unwrap().document);

    assert!(shown_text(&doc, 0).is_empty());
    assert_eq!(shown_text(&doc, 1), vec!["i"]);
    assert_eq!(shown_text(&doc, 2), vec!["ii"]);
    assert_eq!(shown_text(&doc, 3), vec!["iii"]);
}

#[test]
fn test_bottom_center_number_is_centered() {
    let doc = create_test_pdf(1);
    let options = PageNumberOptions {
        font_size: 10.0,
        margin: 20.0,
        ..Default::default()
    };
    let doc = Operation::PageNumbers(options)
        .apply(vec![doc], None, &mut NoProgress)
        .unwrap()
        .remove(0)
        .document;

    // "1" is 5.56pt wide at 10pt on a 612pt page
    let matrix = first_operands(&doc, 0, "Tm").unwrap();
    let x = number(&matrix[4]);
    let y = number(&matrix[5]);
    assert!((x - (612.0 - 5.56) / 2.0).abs() < 0.01, "x = {x}");
    assert!((y - 20.0).abs() < 0.01, "y = {y}");
}

#[test]
fn test_top_right_number_respects_margin() {
    let doc = create_test_pdf(1);
    let options = PageNumberOptions {
        position: NumberPosition::TopRight,
        font_size: 10.0,
        margin: 30.0,
        ..Default::default()
    };
    let doc = Operation::PageNumbers(options)
        .apply(vec![doc], None, &mut NoProgress)
        .unwrap()
        .remove(0)
        .document;

    let matrix = first_operands(&doc, 0, "Tm").unwrap();
    assert!((number(&matrix[4]) - (612.0 - 30.0 - 5.56)).abs() < 0.01);
    assert!((number(&matrix[5]) - (792.0 - 30.0 - 10.0)).abs() < 0.01);
}

#[test]
fn test_template_without_placeholder_is_rejected() {
    let options = PageNumberOptions {
        format: NumberFormat::Custom("Page".to_string()),
        ..Default::default()
    };
    let result = Operation::PageNumbers(options).apply(vec![create_test_pdf(1)], None, &mut NoProgress);
    assert!(matches!(result, Err(PageOpsError::Config(_))));
}

#[test]
fn test_counter_saturates_at_the_top_of_the_range() {
    let options = PageNumberOptions {
        start_number: i64::MAX,
        ..Default::default()
    };
    let labels = options.labels(2);
    assert_eq!(labels.len(), 2);
    assert_eq!(labels[0].as_deref(), Some("9223372036854775807"));
}

#[test]
fn test_out_of_range_start_number_is_rejected() {
    for start_number in [i64::MAX, i64::MIN, constants::MAX_START_NUMBER + 1] {
        let options = PageNumberOptions {
            start_number,
            ..Default::default()
        };
        assert!(matches!(options.validate(), Err(PageOpsError::Config(_))));
    }

    let bounded = PageNumberOptions {
        start_number: -constants::MAX_START_NUMBER,
        ..Default::default()
    };
    assert!(bounded.validate().is_ok());
}

#[test]
fn test_huge_roman_start_uses_arabic_digits() {
    let options = PageNumberOptions {
        format: NumberFormat::Roman,
        start_number: 3999,
        ..Default::default()
    };
    let labels: Vec<_> = options.labels(2).into_iter().flatten().collect();
    assert_eq!(labels, vec!["mmmcmxcix", "4000"]);
}
