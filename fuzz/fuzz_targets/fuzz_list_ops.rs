#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lockstep_core::{Binding, Key, RenderList, Ring};

#[derive(Arbitrary, Debug)]
enum FuzzOp {
    Set { index: u8, value: i16 },
    Delete { index: u8 },
    Push(i16),
    PushAll(Vec<i16>),
    Unshift(i16),
    UnshiftAll(Vec<i16>),
    Pop,
    Shift,
    Splice { start: u8, delete_count: u8, inserts: Vec<i16> },
    Reverse,
    Sort,
    Render,
}

fn keyed() -> Binding<i16, String> {
    Binding::new(|n: &i16| format!("#{n}"), |n: &i16| Key::Int(i64::from(*n)))
}

fn check(list: &RenderList<i16, String>) {
    // Lock step: occupied slots agree on position and key with their nodes.
    let mut occupied = 0usize;
    for (index, slot) in list.iter().enumerate() {
        match slot {
            Some(item) => {
                occupied += 1;
                assert_eq!(list.node_key(index), Some(&Key::Int(i64::from(*item))));
            }
            None => assert_eq!(list.node_key(index), None),
        }
    }
    assert_eq!(occupied, list.occupied());
}

fuzz_target!(|input: (bool, Vec<FuzzOp>)| {
    let (ring, ops) = input;
    let mut list = if ring {
        RenderList::with_flavor(keyed(), Ring::new(8))
    } else {
        RenderList::new(keyed())
    };
    let mut last_generation = 0u64;

    for op in ops {
        if list.len() > 1024 {
            break;
        }
        match op {
            FuzzOp::Set { index, value } => {
                let _ = list.set(usize::from(index), value);
            }
            FuzzOp::Delete { index } => {
                let _ = list.delete(usize::from(index));
            }
            FuzzOp::Push(value) => {
                let _ = list.push(value);
            }
            FuzzOp::PushAll(values) => {
                let _ = list.push_all(values);
            }
            FuzzOp::Unshift(value) => {
                let _ = list.unshift(value);
            }
            FuzzOp::UnshiftAll(values) => {
                let _ = list.unshift_all(values);
            }
            FuzzOp::Pop => {
                let _ = list.pop();
            }
            FuzzOp::Shift => {
                let _ = list.shift();
            }
            FuzzOp::Splice { start, delete_count, inserts } => {
                let _ = list.splice(usize::from(start), usize::from(delete_count), inserts);
            }
            FuzzOp::Reverse => {
                let _ = list.reverse();
            }
            FuzzOp::Sort => {
                let _ = list.sort_by(|a, b| a.cmp(b));
            }
            FuzzOp::Render => {
                let frame = list.render();
                // Frames compact holes away and generations never run
                // backwards.
                assert_eq!(frame.len(), list.occupied());
                assert!(frame.generation() >= last_generation);
                last_generation = frame.generation();
                let again = list.render();
                assert!(frame.same(&again));
            }
        }
        if ring {
            assert!(list.len() <= 8);
        }
        check(&list);
    }
});
