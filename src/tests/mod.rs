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
use rnacanvas_svg::Element;
use std::rc::Rc;

mod straight_bond;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn base_at(x: f64, y: f64) -> Rc<BaseMarker> {
    let base = BaseMarker::create("G");
    base.set_center(Point::new(x, y));
    base
}

fn line_between(x1: f64, y1: f64, x2: f64, y2: f64) -> Element {
    let line = Element::line();
    for (name, value) in [("x1", x1), ("y1", y1), ("x2", x2), ("y2", y2)] {
        line.set_attribute(name, value.to_string()).unwrap();
    }
    line
}

fn number_attribute<B: Nucleobase>(bond: &StraightBond<B>, name: &str) -> f64 {
    bond.get_attribute(name)
        .expect("missing attribute")
        .parse()
        .expect("not a number")
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {}, got {}",
        expected,
        actual
    );
}

/// A drawing of ten bases on a horizontal line, 20 units apart.
fn drawing_with_ten_bases() -> SvgDrawing {
    let drawing = SvgDrawing::new();
    for i in 0..10 {
        drawing
            .append_base(base_at(20. * i as f64, 0.))
            .unwrap();
    }
    drawing
}
