/*
rnacanvas bonds, straight bonds between the bases of nucleic acid structure drawings.
    Copyright (C) 2026  The rnacanvas bonds developers

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU General Public License as published by
    the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU General Public License for more details.

    You should have received a copy of the GNU General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/
use super::*;
use crate::drawing::Drawing;
use rnacanvas_svg::line::RenderError;
use rnacanvas_svg::Document;
use serde_json::json;

#[test]
fn between_keeps_the_order_of_the_bases() {
    let base1 = base_at(0., 0.);
    let base2 = base_at(10., 0.);
    let sb = StraightBond::between(base1.clone(), base2.clone());
    assert!(Rc::ptr_eq(sb.base1(), &base1));
    assert!(Rc::ptr_eq(sb.base2(), &base2));

    let (first, second) = sb.base_pair();
    assert!(Rc::ptr_eq(&first, &base1));
    assert!(Rc::ptr_eq(&second, &base2));
}

#[test]
fn between_assigns_a_uuid() {
    let sb = StraightBond::between(base_at(0., 0.), base_at(1., 1.));
    assert!(sb.id().len() >= 36);
}

#[test]
fn between_applies_the_defaults() {
    let sb = StraightBond::between(base_at(0., 0.), base_at(100., 0.));
    assert_eq!(sb.get_attribute("stroke").as_deref(), Some("#000000"));
    assert_eq!(sb.get_attribute("stroke-width").as_deref(), Some("2"));
    assert_close(sb.base_padding1(), 6.);
    assert_close(sb.base_padding2(), 6.);
}

#[test]
fn between_with_custom_defaults() {
    let defaults = StraightBondDefaults::from_json(
        r##"{ "attributes": { "stroke": "#abcdef" }, "basePadding1": 2, "basePadding2": -4 }"##,
    )
    .unwrap();
    let sb = StraightBond::between_with_defaults(base_at(0., 0.), base_at(100., 0.), &defaults);
    assert_eq!(sb.get_attribute("stroke").as_deref(), Some("#abcdef"));
    assert_eq!(sb.get_attribute("stroke-width"), None);
    assert_close(sb.base_padding1(), 2.);
    // clamped
    assert_close(sb.base_padding2(), 0.);
}

#[test]
fn between_positions_the_new_bond() {
    init_logger();
    let sb = StraightBond::between(base_at(512.8, 88.7), base_at(-102.4, -33.));
    assert!((number_attribute(&sb, "x1") - 506.9140633847461).abs() < 1e-9);
    assert!((number_attribute(&sb, "y1") - 87.53563315007088).abs() < 1e-9);
    assert!((number_attribute(&sb, "x2") - -96.51406338474614).abs() < 1e-9);
    assert!((number_attribute(&sb, "y2") - -31.835633150070876).abs() < 1e-9);
}

#[test]
fn new_caches_the_current_base_paddings() {
    let base1 = base_at(20., 5.);
    let base2 = base_at(101., 98.1);
    let line = line_between(8.34, -80., 123., 62.);

    let sb = StraightBond::new(line.clone(), base1.clone(), base2.clone());
    assert_eq!(*sb.dom_node(), line);
    assert_close(sb.base_padding1(), 85.79601156230981);
    assert_close(sb.base_padding2(), 42.27540656220824);

    // no default value is applied
    assert_eq!(sb.get_attribute("stroke"), None);
    assert_eq!(sb.id(), "");

    // nor is the bond repositioned
    assert_close(sb.point1().x, 8.34);
    assert_close(sb.point2().y, 62.);
}

#[test]
fn new_follows_the_moves_of_both_bases() {
    let base1 = base_at(20., 5.);
    let base2 = base_at(101., 98.1);
    let line = line_between(8.34, -80., 123., 62.);
    let sb = StraightBond::new(line.clone(), base1.clone(), base2.clone());

    line.remove_attribute("x1");
    line.remove_attribute("y1");
    base1.center_point().set_x(40.);
    assert!(sb.get_attribute("x1").is_some());
    assert!(sb.get_attribute("y1").is_some());

    line.remove_attribute("x2");
    line.remove_attribute("y2");
    base2.center_point().set_y(88.1);
    assert!(sb.get_attribute("x2").is_some());
    assert!(sb.get_attribute("y2").is_some());
}

#[test]
fn get_and_set_attributes() {
    let line = Element::line();
    let sb = StraightBond::new(line.clone(), base_at(0., 0.), base_at(1., 0.));

    line.set_attribute("stroke", "#5567ab").unwrap();
    assert_eq!(sb.get_attribute("stroke").as_deref(), Some("#5567ab"));

    sb.set_attribute("stroke-linecap", "round").unwrap();
    assert_eq!(line.get_attribute("stroke-linecap").as_deref(), Some("round"));

    assert!(sb.set_attribute("stroke linecap", "round").is_err());
}

#[test]
fn set_attributes() {
    let sb = StraightBond::between(base_at(0., 0.), base_at(1., 0.));
    let errors = sb.set_attributes(&json!({
        "stroke": "#ee52bc",
        "stroke-width": 8.27,
        "stroke-dasharray": "2 3.1 5 5",
    }));
    assert!(errors.is_empty());
    assert_eq!(sb.get_attribute("stroke").as_deref(), Some("#ee52bc"));
    assert_eq!(sb.get_attribute("stroke-width").as_deref(), Some("8.27"));
    assert_eq!(
        sb.get_attribute("stroke-dasharray").as_deref(),
        Some("2 3.1 5 5")
    );

    sb.set_attributes(&json!({ "stroke-dasharray": null }));
    assert_eq!(sb.get_attribute("stroke-dasharray"), None);
}

#[test]
fn set_attributes_ignores_invalid_inputs() {
    let sb = StraightBond::between(base_at(0., 0.), base_at(1., 0.));
    let before = sb.dom_node().attributes();

    assert_eq!(
        sb.set_attributes(&json!(null)),
        vec![FieldError::NotAnObject(String::from("attributes"))]
    );
    sb.set_attributes(&json!("qwer"));
    assert_eq!(sb.dom_node().attributes(), before);

    assert!(sb.set_attributes(&json!({ "asdf": false })).is_empty());
    assert_eq!(sb.get_attribute("asdf").as_deref(), Some("false"));
}

#[test]
fn set_attributes_applies_the_valid_entries_of_a_partially_invalid_map() {
    let sb = StraightBond::between(base_at(0., 0.), base_at(1., 0.));
    let errors = sb.set_attributes(&json!({
        "bad name": "1",
        "stroke": "#123456",
        "stroke-dasharray": [1, 2],
    }));
    assert_eq!(errors.len(), 2);
    assert!(errors.contains(&FieldError::UnsupportedAttributeValue(String::from(
        "stroke-dasharray"
    ))));
    assert_eq!(sb.get_attribute("stroke").as_deref(), Some("#123456"));
}

#[test]
fn id_getter() {
    let line = Element::line();
    line.set_id("line-38147827491827492");
    let sb = StraightBond::new(line, base_at(0., 0.), base_at(1., 0.));
    assert_eq!(sb.id(), "line-38147827491827492");
}

#[test]
fn id_getter_does_not_assign_an_id() {
    let line = Element::line();
    let sb = StraightBond::new(line.clone(), base_at(0., 0.), base_at(1., 0.));
    assert_eq!(sb.id(), "");
    assert!(!line.has_attribute("id"));
}

#[test]
fn assign_uuid() {
    let sb = StraightBond::new(Element::line(), base_at(0., 0.), base_at(1., 0.));
    assert_eq!(sb.id(), "");
    sb.assign_uuid();
    assert!(sb.id().len() >= 36);
    assert!(sb.id().chars().next().unwrap().is_ascii_alphabetic());
}

#[test]
fn containment() {
    let line = Element::line();
    let sb = StraightBond::new(line.clone(), base_at(0., 0.), base_at(1., 0.));
    let container1 = Element::new("svg");
    let container2 = Element::new("svg");
    assert!(!sb.has_parent());

    sb.append_to(&container1).unwrap();
    assert!(container1.contains(&line));
    assert!(sb.is_in(&container1));
    assert!(!sb.is_in(&container2));
    assert!(!sb.is_in(&line));
    assert!(sb.has_parent());

    sb.remove();
    assert!(!container1.contains(&line));
    assert!(!sb.has_parent());

    // without going through the bond
    container2.append_child(&line).unwrap();
    assert!(sb.has_parent());
}

#[test]
fn length_queries_require_a_rendered_bond() {
    let sb = StraightBond::between(base_at(0., 0.), base_at(100., 0.));
    assert_eq!(sb.get_total_length(), Err(RenderError::NotRendered));
    assert_eq!(sb.get_point_at_length(10.), Err(RenderError::NotRendered));

    let document = Document::new();
    sb.append_to(document.root()).unwrap();
    assert_close(sb.get_total_length().unwrap(), 88.);
    let p = sb.get_point_at_length(10.).unwrap();
    assert_close(p.x, 16.);
    assert_close(p.y, 0.);
}

#[test]
fn end_points_are_read_before_rendering() {
    let sb = StraightBond::new(
        line_between(15.3819, -82.3718, -9927.3, 48791.3),
        base_at(0., 0.),
        base_at(1., 0.),
    );
    assert_close(sb.point1().x, 15.3819);
    assert_close(sb.point1().y, -82.3718);
    assert_close(sb.point2().x, -9927.3);
    assert_close(sb.point2().y, 48791.3);
}

#[test]
fn base_padding1_is_cached() {
    let base1 = base_at(15., 5.);
    let base2 = base_at(45., 5.);
    let sb = StraightBond::new(line_between(18., 5., 37., 5.), base1.clone(), base2);
    assert_close(sb.base_padding1(), 3.);

    base1.set_center(Point::new(45., 50.));
    // has not changed
    assert_close(sb.base_padding1(), 3.);

    sb.store_base_padding1(7.);
    assert_close(sb.base_padding1(), 7.);
    assert_close(number_attribute(&sb, "x1"), 45.);
    assert_close(number_attribute(&sb, "y1"), 43.);
    assert_close(number_attribute(&sb, "x2"), 45.);
    assert_close(number_attribute(&sb, "y2"), 13.);
}

#[test]
fn base_padding2_is_cached() {
    let base1 = base_at(9., -8.);
    let base2 = base_at(9., 30.);
    let sb = StraightBond::new(line_between(9., -6., 9., 24.), base1, base2.clone());
    assert_close(sb.base_padding2(), 6.);

    base2.set_center(Point::new(-30., -8.));
    assert_close(sb.base_padding2(), 6.);

    sb.store_base_padding2(10.5);
    assert_close(sb.base_padding2(), 10.5);
    assert_close(number_attribute(&sb, "x1"), 7.);
    assert_close(number_attribute(&sb, "y1"), -8.);
    assert_close(number_attribute(&sb, "x2"), -19.5);
    assert_close(number_attribute(&sb, "y2"), -8.);
}

#[test]
fn set_base_paddings() {
    let sb = StraightBond::between(base_at(0., 0.), base_at(100., 0.));
    sb.set_base_padding1(57.096);
    sb.set_base_padding2(88.291);
    assert_close(sb.base_padding1(), 57.096);
    assert_close(sb.base_padding2(), 88.291);
}

#[test]
fn set_base_paddings_ignore_non_finite_values() {
    let sb = StraightBond::between(base_at(0., 0.), base_at(100., 0.));
    sb.store_base_padding1(12.08);
    sb.store_base_padding2(23.81);

    for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        sb.set_base_padding1(value);
        sb.set_base_padding2(value);
    }
    for value in [json!("5"), json!(true), json!({}), json!(null), json!([1])] {
        let errors = sb.set(&json!({ "basePadding1": value, "basePadding2": value }));
        assert_eq!(errors.len(), 2);
    }
    // absent fields are not errors
    assert!(sb.set(&json!({})).is_empty());

    assert_close(sb.base_padding1(), 12.08);
    assert_close(sb.base_padding2(), 23.81);
}

#[test]
fn set_base_paddings_clamp_negative_values() {
    let sb = StraightBond::between(base_at(0., 0.), base_at(100., 0.));
    sb.store_base_padding1(18.);
    sb.store_base_padding2(15.);
    sb.set_base_padding1(-10.);
    sb.set_base_padding2(-12.);
    assert_eq!(sb.base_padding1(), 0.);
    assert_eq!(sb.base_padding2(), 0.);
}

#[test]
fn end_points_follow_the_paddings() {
    let a = Point::new(-3.5, 12.);
    let b = Point::new(40., -7.25);
    let unit = (b - a) / points::distance(a, b);
    let sb = StraightBond::between(base_at(a.x, a.y), base_at(b.x, b.y));
    for (p1, p2) in [(0., 0.), (1.5, 9.), (20., 3.25), (30., 30.)] {
        sb.set_base_padding1(p1);
        sb.set_base_padding2(p2);
        let expected1 = a + unit * p1;
        let expected2 = b - unit * p2;
        assert_close(sb.point1().x, expected1.x);
        assert_close(sb.point1().y, expected1.y);
        assert_close(sb.point2().x, expected2.x);
        assert_close(sb.point2().y, expected2.y);
    }
}

#[test]
fn repositioning_is_idempotent() {
    let sb = StraightBond::between(base_at(1., 2.), base_at(31., -18.));
    sb.set_base_padding1(4.2);
    let before = sb.dom_node().attributes();
    sb.set_base_padding1(4.2);
    sb.reposition();
    assert_eq!(sb.dom_node().attributes(), before);
}

#[test]
fn is_inverted() {
    let base1 = base_at(60., 10.);
    let base2 = base_at(68., -5.);
    let sb = StraightBond::between(base1, base2);

    sb.store_base_padding1(4.);
    sb.store_base_padding2(6.);
    assert!(!sb.is_inverted());

    sb.store_base_padding1(15.);
    assert!(sb.is_inverted());

    // exactly the distance between the bases
    sb.store_base_padding1(11.);
    assert!(!sb.is_inverted());
}

#[test]
fn set() {
    let sb = StraightBond::between(base_at(0., 0.), base_at(100., 0.));
    let errors = sb.set(&json!({ "attributes": { "stroke": "#ab598d", "stroke-width": "8.15" } }));
    assert!(errors.is_empty());
    assert_eq!(sb.get_attribute("stroke").as_deref(), Some("#ab598d"));
    assert_eq!(sb.get_attribute("stroke-width").as_deref(), Some("8.15"));

    sb.set(&json!({ "basePadding1": 8.719, "basePadding2": 15.42 }));
    assert_close(sb.base_padding1(), 8.719);
    assert_close(sb.base_padding2(), 15.42);
}

#[test]
fn set_applies_the_valid_fields_of_a_partially_invalid_input() {
    init_logger();
    let sb = StraightBond::between(base_at(0., 0.), base_at(100., 0.));
    let errors = sb.set(&json!({
        "attributes": "stroke",
        "basePadding1": "5",
        "basePadding2": 3.5,
    }));
    assert_eq!(
        errors,
        vec![
            FieldError::NotAnObject(String::from("attributes")),
            FieldError::NotAFiniteNumber(String::from("basePadding1")),
        ]
    );
    assert_close(sb.base_padding1(), 6.);
    assert_close(sb.base_padding2(), 3.5);

    assert_eq!(sb.set(&json!(12)).len(), 1);
}

#[test]
fn serialized() {
    let sb = StraightBond::between(base_at(0., 0.), base_at(100., 0.));
    sb.dom_node().set_id("id-7851826");
    sb.store_base_padding1(3.25);
    let saved = sb.serialized().unwrap();
    assert_eq!(saved.id, "id-7851826");
    assert_eq!(saved.base_id1, sb.base1().id());
    assert_eq!(saved.base_id2, sb.base2().id());
    assert_eq!(saved.base_padding1, Some(3.25));
    assert_eq!(saved.base_padding2, Some(6.));
}

#[test]
fn serialized_requires_ids() {
    let sb = StraightBond::new(Element::line(), base_at(0., 0.), base_at(1., 0.));
    assert_eq!(sb.serialized(), Err(SerializationError::MissingId));

    let anonymous = BaseMarker::from_text(Element::new("text"), Point::zero());
    let sb = StraightBond::between(anonymous.clone(), base_at(1., 0.));
    assert_eq!(sb.serialized(), Err(SerializationError::MissingBaseId1));
    let sb = StraightBond::between(base_at(1., 0.), anonymous);
    assert_eq!(sb.serialized(), Err(SerializationError::MissingBaseId2));
}

/// A bond between bases 6 and 3 of a drawing, inserted among the children of the drawing.
fn saved_bond_of_drawing(drawing: &SvgDrawing) -> StraightBond<BaseMarker> {
    let bases = drawing.bases();
    let sb = StraightBond::between(bases[6].clone(), bases[3].clone());
    let children = drawing.dom_node().children();
    drawing
        .dom_node()
        .insert_before(sb.dom_node(), Some(&children[5]))
        .unwrap();
    sb.store_base_padding1(12.7846174);
    sb.store_base_padding2(4.76824);
    sb
}

#[test]
fn deserialized() {
    let drawing = drawing_with_ten_bases();
    let sb1 = saved_bond_of_drawing(&drawing);

    let sb2 = StraightBond::deserialized(&sb1.serialized().unwrap().to_value(), &drawing).unwrap();
    assert_eq!(sb2.dom_node(), sb1.dom_node());
    assert!(Rc::ptr_eq(sb2.base1(), sb1.base1()));
    assert!(Rc::ptr_eq(sb2.base2(), sb1.base2()));
    assert_close(sb2.base_padding1(), 12.7846174);
    assert_close(sb2.base_padding2(), 4.76824);
    assert_eq!(sb2.id(), sb1.id());
}

#[test]
fn deserialized_legacy_forms() {
    let drawing = drawing_with_ten_bases();
    let sb1 = saved_bond_of_drawing(&drawing);
    let current = sb1.serialized().unwrap().to_value();

    let mut with_line_id = current.clone();
    with_line_id["id"] = json!(null);
    with_line_id["lineId"] = json!(sb1.id());
    let sb2 = StraightBond::deserialized(&with_line_id, &drawing).unwrap();
    assert_eq!(sb2.dom_node(), sb1.dom_node());

    let legacy = json!({
        "lineId": sb1.id(),
        "baseId1": sb1.base1().id(),
        "baseId2": sb1.base2().id(),
    });
    let sb2 = StraightBond::deserialized(&legacy, &drawing).unwrap();
    assert_eq!(sb2.dom_node(), sb1.dom_node());
    assert!(Rc::ptr_eq(sb2.base1(), sb1.base1()));
    assert!(Rc::ptr_eq(sb2.base2(), sb1.base2()));
}

#[test]
fn deserialized_keeps_saved_paddings_as_they_are() {
    let drawing = drawing_with_ten_bases();
    let sb1 = saved_bond_of_drawing(&drawing);
    let mut saved = sb1.serialized().unwrap().to_value();
    saved["basePadding1"] = json!(-8.735814);
    saved["basePadding2"] = json!(65.41487);
    let sb2 = StraightBond::deserialized(&saved, &drawing).unwrap();
    assert_close(sb2.base_padding1(), -8.735814);
    assert_close(sb2.base_padding2(), 65.41487);
}

#[test]
fn deserialized_without_paddings_measures_them() {
    let drawing = drawing_with_ten_bases();
    let sb1 = saved_bond_of_drawing(&drawing);
    let mut saved = sb1.serialized().unwrap().to_value();
    saved["basePadding1"] = json!("12");
    saved.as_object_mut().unwrap().remove("basePadding2");

    let sb2 = StraightBond::deserialized(&saved, &drawing).unwrap();
    assert_close(sb2.base_padding1(), 12.7846174);
    assert_close(sb2.base_padding2(), 4.76824);
}

#[test]
fn deserialized_failures() {
    let drawing = drawing_with_ten_bases();
    let sb1 = saved_bond_of_drawing(&drawing);
    let saved = sb1.serialized().unwrap().to_value();

    assert_eq!(
        StraightBond::deserialized(&json!(null), &drawing).unwrap_err(),
        DeserializationError::NotAnObject
    );

    let mut unknown_line = saved.clone();
    unknown_line["id"] = json!("id-unknown");
    assert_eq!(
        StraightBond::deserialized(&unknown_line, &drawing).unwrap_err(),
        DeserializationError::LineNotFound(String::from("id-unknown"))
    );

    let mut not_a_line = saved.clone();
    not_a_line["id"] = json!(drawing.bases()[0].id());
    assert!(matches!(
        StraightBond::deserialized(&not_a_line, &drawing),
        Err(DeserializationError::NotALine { .. })
    ));

    let mut unknown_base = saved.clone();
    unknown_base["baseID2"] = json!("id-unknown");
    assert_eq!(
        StraightBond::deserialized(&unknown_base, &drawing).unwrap_err(),
        DeserializationError::BaseNotFound(String::from("id-unknown"))
    );

    let mut missing_base = saved;
    missing_base.as_object_mut().unwrap().remove("baseID1");
    assert_eq!(
        StraightBond::deserialized(&missing_base, &drawing).unwrap_err(),
        DeserializationError::MissingBaseId1
    );
}

#[test]
fn dropped_bonds_stop_listening_to_their_bases() {
    let base1 = base_at(0., 0.);
    let base2 = base_at(50., 0.);
    let sb = StraightBond::between(base1.clone(), base2.clone());
    let clone = sb.clone();
    assert_eq!(base1.nb_move_listeners(), 1);
    assert_eq!(base2.nb_move_listeners(), 1);

    drop(sb);
    assert_eq!(base1.nb_move_listeners(), 1);
    drop(clone);
    assert_eq!(base1.nb_move_listeners(), 0);
    assert_eq!(base2.nb_move_listeners(), 0);
}

#[test]
fn disposed_bonds_no_longer_follow_their_bases() {
    let base1 = base_at(0., 0.);
    let sb = StraightBond::between(base1.clone(), base_at(50., 0.));
    sb.dispose();
    assert_eq!(base1.nb_move_listeners(), 0);
    let before = sb.point1();
    base1.set_center(Point::new(10., 10.));
    assert_eq!(sb.point1(), before);
}

#[test]
fn reposition_listeners() {
    let base1 = base_at(0., 0.);
    let sb = StraightBond::between(base1.clone(), base_at(50., 0.));
    let count = Rc::new(std::cell::Cell::new(0));
    let c = count.clone();
    let subscription = sb.on_reposition(Rc::new(move || c.set(c.get() + 1)));

    base1.set_center(Point::new(1., 1.));
    sb.set_base_padding2(3.);
    assert_eq!(count.get(), 2);

    drop(subscription);
    base1.set_center(Point::new(2., 2.));
    assert_eq!(count.get(), 2);
}
