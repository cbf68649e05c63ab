//! Built-in models.
//!
//! `sort` orders a list from the input into context `sorted`; `tool` queues a request
//! record under `tool_requests` and mirrors the queue under `plan`.
use std::cmp::Ordering;

use td_core::ops::{get_member, gt, lt};
use td_core::{Context, Value, keys};
use td_ir::ModelDecl;
use td_syntax::find_best_match;

use crate::RuntimeError;

pub(crate) const SORT: &str = "sort";
pub(crate) const TOOL: &str = "tool";
const MODEL_TYPES: [&str; 2] = [SORT, TOOL];

const BUBBLE: &str = "bubble";
const NATIVE: &str = "native";
const ALGORITHMS: [&str; 2] = [BUBBLE, NATIVE];

pub(crate) fn run_model(ctx: &mut Context, model: &ModelDecl) -> Result<(), RuntimeError> {
    match model.ty.as_str() {
        SORT => sort(ctx, &model.sort_algorithm(), model.sort_key().as_deref()),
        TOOL => {
            push_tool_request(ctx, model.args_object());
            Ok(())
        }
        other => Err(RuntimeError::UnknownModel {
            ty: other.to_string(),
            suggestion: find_best_match(other, MODEL_TYPES.into_iter()),
        }),
    }
}

/// Sort the list found in the context and bind the result to `sorted`.
pub(crate) fn sort(ctx: &mut Context, algorithm: &str, key: Option<&str>) -> Result<(), RuntimeError> {
    if !ALGORITHMS.contains(&algorithm) {
        return Err(RuntimeError::UnknownSortAlgorithm {
            name: algorithm.to_string(),
            suggestion: find_best_match(algorithm, ALGORITHMS.into_iter()),
        });
    }
    let items = sort_source(ctx)?;
    let keyed: Vec<(Value, Value)> = items
        .iter()
        .map(|v| {
            let k = match key {
                Some(k) => get_member(v, k),
                None => v.clone(),
            };
            (k, v.clone())
        })
        .collect();
    let sorted = if algorithm == BUBBLE {
        bubble_sort(keyed)
    } else {
        native_sort(keyed)
    };
    tracing::debug!(algorithm, len = sorted.len(), "sorted");
    ctx.set(keys::SORTED, Value::List(sorted));
    Ok(())
}

/// Context `input` when it is a list, else its `list` field, else context `list`.
fn sort_source(ctx: &Context) -> Result<Vec<Value>, RuntimeError> {
    let input = ctx.get(keys::INPUT);
    if let Value::List(items) = input {
        return Ok(items);
    }
    if let Value::List(items) = get_member(&input, keys::LIST) {
        return Ok(items);
    }
    match ctx.get(keys::LIST) {
        Value::List(items) => Ok(items),
        _ => Err(RuntimeError::SortInputNotArray {
            found: input.type_name(),
        }),
    }
}

fn bubble_sort(mut items: Vec<(Value, Value)>) -> Vec<Value> {
    let n = items.len();
    for pass in 0..n {
        let mut swapped = false;
        for j in 0..n - 1 - pass {
            if gt(&items[j].0, &items[j + 1].0) {
                items.swap(j, j + 1);
                swapped = true;
            }
        }
        if !swapped {
            break;
        }
    }
    items.into_iter().map(|(_, v)| v).collect()
}

fn compare_keys(a: &Value, b: &Value) -> Ordering {
    if lt(a, b) {
        Ordering::Less
    } else if gt(a, b) {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// Stable merge sort over `compare_keys`.
fn native_sort(items: Vec<(Value, Value)>) -> Vec<Value> {
    merge_sort(items).into_iter().map(|(_, v)| v).collect()
}

fn merge_sort(mut items: Vec<(Value, Value)>) -> Vec<(Value, Value)> {
    if items.len() <= 1 {
        return items;
    }
    let right = merge_sort(items.split_off(items.len() / 2));
    let left = merge_sort(items);
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => compare_keys(&r.0, &l.0) == Ordering::Less,
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        let next = if take_right { right.next() } else { left.next() };
        merged.extend(next);
    }
    merged
}

pub(crate) fn push_tool_request(ctx: &mut Context, request: Value) {
    let mut queue = match ctx.get(keys::TOOL_REQUESTS) {
        Value::List(items) => items,
        _ => Vec::new(),
    };
    queue.push(request);
    tracing::debug!(pending = queue.len(), "tool request queued");
    ctx.set(keys::PLAN, Value::List(queue.clone()));
    ctx.set(keys::TOOL_REQUESTS, Value::List(queue));
}
