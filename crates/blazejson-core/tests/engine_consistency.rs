//! Engine Consistency Tests
//!
//! These tests ensure the engine produces 100% identical output no matter
//! which strategy, thread count, or chunk target a call runs with. This
//! is CRITICAL for correctness - callers must get the same bytes on any
//! system and any configuration.

use blazejson_core::{
    chunk, validate, EngineConfig, MinifyEngine, MinifyError, OptimizationLevel,
};

// =============================================================================
// Scalar Reference Implementation
// =============================================================================

mod reference {
    //! Pure scalar minifier that serves as the ground truth.
    //! Every engine configuration must match this exactly.

    pub fn minify(input: &[u8]) -> Vec<u8> {
        let mut output = Vec::with_capacity(input.len());
        let mut in_string = false;
        let mut escape_active = false;
        for &byte in input {
            if escape_active {
                escape_active = false;
                output.push(byte);
            } else if in_string {
                match byte {
                    b'\\' => escape_active = true,
                    b'"' => in_string = false,
                    _ => {}
                }
                output.push(byte);
            } else {
                match byte {
                    b'"' => {
                        in_string = true;
                        output.push(byte);
                    }
                    b' ' | b'\t' | b'\n' | b'\r' => {}
                    _ => output.push(byte),
                }
            }
        }
        output
    }
}

// =============================================================================
// Test Data Generation
// =============================================================================

fn integer_array(elements: usize) -> Vec<u8> {
    let mut input = Vec::from(&b"[ "[..]);
    for i in 0..elements {
        if i > 0 {
            input.extend_from_slice(b" ,  ");
        }
        input.extend_from_slice((i % 1_000_000).to_string().as_bytes());
    }
    input.extend_from_slice(b" ]");
    input
}

fn nested_document(entries: usize) -> Vec<u8> {
    let mut input = Vec::from(&b"{\n  \"records\" : [\n"[..]);
    for i in 0..entries {
        if i > 0 {
            input.extend_from_slice(b" ,\n");
        }
        input.extend_from_slice(
            format!(
                "    {{ \"id\" : {i} , \"name\" : \"record  {i}\" , \"tags\" : [ \"a b\" , \"c\\\"d\" ] , \"meta\" : {{ \"ok\" : true }} }}"
            )
            .as_bytes(),
        );
    }
    input.extend_from_slice(b"\n  ]\n}\n");
    input
}

fn engine(level: OptimizationLevel, threads: usize, chunk_target: usize) -> MinifyEngine {
    MinifyEngine::new(
        EngineConfig::builder()
            .optimization_level(level)
            .worker_threads(threads)
            .chunk_target_count(chunk_target)
            .parallel_threshold(4 * 1024)
            .min_chunk_size(256)
            .build(),
    )
    .unwrap()
}

// =============================================================================
// Concrete Scenarios
// =============================================================================

#[test]
fn test_scenario_object_with_array() {
    let engine = MinifyEngine::with_defaults().unwrap();
    assert_eq!(
        engine.minify(br#"{ "a" : 1 , "b" : [ 1 , 2 , 3 ] }"#).unwrap(),
        br#"{"a":1,"b":[1,2,3]}"#
    );
}

#[test]
fn test_scenario_internal_whitespace_untouched() {
    let engine = MinifyEngine::with_defaults().unwrap();
    assert_eq!(
        engine.minify(br#"{"msg": "  hello   world  "}"#).unwrap(),
        br#"{"msg":"  hello   world  "}"#
    );
}

#[test]
fn test_scenario_escaped_quotes() {
    let engine = MinifyEngine::with_defaults().unwrap();
    assert_eq!(
        engine.minify(br#"{"a":"she said \"hi\""}"#).unwrap(),
        br#"{"a":"she said \"hi\""}"#
    );
}

#[test]
fn test_scenario_large_array_parallel_determinism() {
    // A multi-megabyte array split across 4 workers must equal the
    // single-thread, single-chunk result
    let input = integer_array(1_000_000);
    assert!(input.len() > 4 * 1024 * 1024);

    let single = engine(OptimizationLevel::None, 1, 1);
    let parallel = engine(OptimizationLevel::Extreme, 4, 4);

    let expected = single.minify(&input).unwrap();
    assert_eq!(parallel.minify(&input).unwrap(), expected);
    assert_eq!(expected, reference::minify(&input));
}

#[test]
fn test_scenario_minify_into_undersized() {
    let engine = MinifyEngine::with_defaults().unwrap();
    let input = nested_document(5);
    let mut output = vec![0x55u8; input.len() - 1];
    match engine.minify_into(&input, &mut output) {
        Err(MinifyError::BufferTooSmall { .. }) => {}
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(output.iter().all(|&b| b == 0x55));
}

// =============================================================================
// Determinism Under Concurrency
// =============================================================================

#[test]
fn test_determinism_across_thread_counts() {
    let input = nested_document(3_000);
    let expected = reference::minify(&input);

    for threads in [1usize, 2, 4, 8] {
        let engine = engine(OptimizationLevel::Extreme, threads, 0);
        assert_eq!(
            engine.minify(&input).unwrap(),
            expected,
            "output diverged with {threads} threads"
        );
    }
}

#[test]
fn test_determinism_across_chunk_targets() {
    let input = integer_array(200_000);
    let expected = reference::minify(&input);

    for chunk_target in [1usize, 2, 3, 5, 7, 16, 64] {
        let engine = engine(OptimizationLevel::Extreme, 4, chunk_target);
        assert_eq!(
            engine.minify(&input).unwrap(),
            expected,
            "output diverged with chunk target {chunk_target}"
        );
    }
}

#[test]
fn test_determinism_across_repeated_calls() {
    let input = nested_document(2_000);
    let engine = engine(OptimizationLevel::Extreme, 4, 8);

    let first = engine.minify(&input).unwrap();
    for _ in 0..10 {
        assert_eq!(engine.minify(&input).unwrap(), first);
    }
}

#[test]
fn test_all_levels_agree() {
    let input = nested_document(1_000);
    let expected = reference::minify(&input);

    for level in [
        OptimizationLevel::None,
        OptimizationLevel::Basic,
        OptimizationLevel::Aggressive,
        OptimizationLevel::Extreme,
        OptimizationLevel::Automatic,
    ] {
        let engine = engine(level, 0, 0);
        assert_eq!(
            engine.minify(&input).unwrap(),
            expected,
            "output diverged at level {level:?}"
        );
    }
}

// =============================================================================
// Algebraic Properties
// =============================================================================

#[test]
fn test_idempotence() {
    let engine = MinifyEngine::with_defaults().unwrap();
    for input in [
        &integer_array(10_000)[..],
        &nested_document(500)[..],
        br#"{"msg": "  spaces  stay  "}"#,
    ] {
        let once = engine.minify(input).unwrap();
        let twice = engine.minify(&once).unwrap();
        assert_eq!(once, twice);
    }
}

#[test]
fn test_non_expansion() {
    let engine = MinifyEngine::with_defaults().unwrap();
    for input in [
        &b""[..],
        b" ",
        br#"{}"#,
        &integer_array(50_000)[..],
        &nested_document(1_000)[..],
    ] {
        let output = engine.minify(input).unwrap();
        assert!(output.len() <= input.len());
    }
}

#[test]
fn test_string_preservation() {
    let engine = MinifyEngine::with_defaults().unwrap();
    let payload = "  two  spaces\tand a tab  ";
    let input = format!("{{ \"k\" : \"{payload}\" }}");
    let output = engine.minify(input.as_bytes()).unwrap();
    let output_str = String::from_utf8(output).unwrap();
    assert!(output_str.contains(payload));
}

#[test]
fn test_minified_output_stays_valid() {
    let input = nested_document(200);
    assert!(validate(&input).is_ok());

    let engine = MinifyEngine::with_defaults().unwrap();
    let output = engine.minify(&input).unwrap();
    assert!(validate(&output).is_ok());
}

// =============================================================================
// Boundary Safety
// =============================================================================

#[test]
fn test_independently_minified_chunks_concatenate() {
    let input = nested_document(4_000);

    for target in [2usize, 4, 9] {
        let chunks = chunk::partition(&input, target, 256);
        let mut concatenated = Vec::new();
        for c in &chunks {
            concatenated.extend_from_slice(&reference::minify(&input[c.offset..c.end()]));
        }
        assert_eq!(
            concatenated,
            reference::minify(&input),
            "chunked minification diverged at target {target}"
        );
    }
}

#[test]
fn test_partition_depth_chaining() {
    let input = nested_document(4_000);
    let chunks = chunk::partition(&input, 8, 256);
    assert!(chunks.len() > 1);

    // Depth at each boundary must equal the recorded start depth of the
    // following chunk, and no boundary may land inside a string
    for pair in chunks.windows(2) {
        let mut depth = 0i32;
        let mut in_string = false;
        let mut escape = false;
        for &b in &input[..pair[1].offset] {
            if escape {
                escape = false;
            } else if in_string {
                match b {
                    b'\\' => escape = true,
                    b'"' => in_string = false,
                    _ => {}
                }
            } else {
                match b {
                    b'"' => in_string = true,
                    b'{' | b'[' => depth += 1,
                    b'}' | b']' => depth -= 1,
                    _ => {}
                }
            }
        }
        assert!(!in_string);
        assert!(!escape);
        assert_eq!(depth, pair[1].start_depth);
    }
}
