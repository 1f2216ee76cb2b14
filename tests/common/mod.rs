//! Object classes shared by the integration tests

#![allow(dead_code)]

use aeroproxy::object_type;
use aeroproxy::Timestamp;

object_type! {
    /// One property of every supported type
    pub struct AllTypesObject("AllTypesObject") {
        "boolCol" => bool_col / set_bool_col: bool,
        "intCol" => int_col / set_int_col: i64,
        "floatCol" => float_col / set_float_col: f32,
        "doubleCol" => double_col / set_double_col: f64,
        "stringCol" => string_col / set_string_col: String,
        "binaryCol" => binary_col / set_binary_col: Vec<u8>,
        "dateCol" => date_col / set_date_col: Timestamp,
        "objectCol" => object_col / set_object_col: Option<BoolObject>,
    }
}

object_type! {
    pub struct BoolObject("BoolObject") {
        "boolCol" => bool_col / set_bool_col: bool,
    }
}

object_type! {
    pub struct IntObject("IntObject") {
        "intCol" => int_col / set_int_col: i64,
    }
}

object_type! {
    pub struct AllIntSizesObject("AllIntSizesObject") {
        "int8" => int8 / set_int8: i8,
        "int16" => int16 / set_int16: i16,
        "int32" => int32 / set_int32: i32,
        "int64" => int64 / set_int64: i64,
    }
}

object_type! {
    /// Self-referencing class for cycle tests
    pub struct NodeObject("NodeObject") {
        "label" => label / set_label: String,
        "next" => next / set_next: Option<NodeObject>,
    }
}

pub const UTF8_TEST_STRING: &str = "值значен™👍☞⎠‱௹♣︎☐▼❒∑⨌⧭иеمرحبا";
