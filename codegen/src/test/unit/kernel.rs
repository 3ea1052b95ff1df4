//! Whole-module generation tests: extraction, signatures, launch
//! comments, determinism, and the all-or-nothing failure contract.

use polygen_ir::{AffineMap, Function, MemorySpace, Module, Node, ScalarType, Type, Value};

use crate::cuda::generate;
use crate::error::Error;
use crate::traits::ExtentDims;

fn global_f32(shape: &[i64]) -> Value {
    Value::new(Type::memref(ScalarType::F32, shape.to_vec(), MemorySpace::Global))
}

fn module_of(kernels: Vec<Node>) -> Module {
    let mut function = Function::new("main");
    for kernel in kernels {
        function.push(kernel);
    }
    let mut module = Module::new();
    module.push(function);
    module
}

/// One block of 8 threads: load, add, store.
fn elementwise_double_kernel() -> Node {
    let input = global_f32(&[8]);
    let output = global_f32(&[8]);

    let mut outer = Node::parallel([1]);
    let mut inner = Node::parallel([8]);
    let tid = inner.induction_vars()[0].clone();

    let load = Node::load(input, AffineMap::identity(1), [tid.clone()]);
    let loaded = load.result().clone();
    let add = Node::add(loaded.clone(), loaded);
    let doubled = add.result().clone();
    let store = Node::store(doubled, output, AffineMap::identity(1), [tid]);

    inner.push(load);
    inner.push(add);
    inner.push(store);
    outer.push(inner);
    outer
}

#[test]
fn elementwise_kernel_generates_the_expected_module() {
    let module = module_of(vec![elementwise_double_kernel()]);
    let source = generate(&module, &ExtentDims).expect("generation failed");

    let expected = "#include \"cuda_runtime.h\"\n\
                    // grid dims: (1,), block dims: (8,)\n\
                    __global__ void kernel0(float* arg0, float* arg1) {\n\
                    \x20\x20auto R0 = arg0[threadIdx.x + 0];\n\
                    \x20\x20auto temp0 = R0 + R0;\n\
                    \x20\x20arg1[threadIdx.x + 0] = temp0;\n\
                    }\n";
    assert_eq!(source, expected);
}

#[test]
fn repeated_generation_is_byte_identical() {
    let module = module_of(vec![elementwise_double_kernel()]);

    let first = generate(&module, &ExtentDims).expect("first run");
    let second = generate(&module, &ExtentDims).expect("second run");
    assert_eq!(first, second);
}

#[test]
fn kernel_names_and_parameters_stay_unique_across_the_module() {
    let module = module_of(vec![elementwise_double_kernel(), elementwise_double_kernel()]);
    let source = generate(&module, &ExtentDims).expect("generation failed");

    assert!(source.contains("__global__ void kernel0(float* arg0, float* arg1) {"), "got:\n{source}");
    assert!(source.contains("__global__ void kernel1(float* arg2, float* arg3) {"), "got:\n{source}");
    assert_eq!(source.matches(RUNTIME_INCLUDE_LINE).count(), 1, "one include for the whole module");
}

const RUNTIME_INCLUDE_LINE: &str = "#include \"cuda_runtime.h\"";

#[test]
fn non_parallel_top_level_nodes_are_not_kernels() {
    let mut function = Function::new("main");
    function.push(Node::const_index(3));
    function.push(elementwise_double_kernel());
    let mut module = Module::new();
    module.push(function);

    let source = generate(&module, &ExtentDims).expect("generation failed");
    assert_eq!(source.matches("__global__").count(), 1);
}

#[test]
fn kernel_without_captured_state_is_malformed() {
    let mut region = Node::parallel([4]);
    region.push(Node::barrier());

    let err = generate(&module_of(vec![region]), &ExtentDims).expect_err("nothing captured");
    assert!(matches!(err, Error::MalformedKernel { .. }), "got {err:?}");
}

#[test]
fn unsupported_kind_fails_the_whole_generation_call() {
    let input = global_f32(&[8]);
    let mut region = Node::parallel([8]);
    let tid = region.induction_vars()[0].clone();

    let load = Node::load(input, AffineMap::identity(1), [tid]);
    let loaded = load.result().clone();
    let select = Node::select(loaded.clone(), loaded.clone(), loaded);
    region.push(load);
    region.push(select);

    let err = generate(&module_of(vec![region]), &ExtentDims).expect_err("select has no emission rule");
    assert!(matches!(err, Error::UnsupportedNodeKind { .. }), "got {err:?}");
}

#[test]
fn tiled_kernel_carries_shared_memory_loops_and_barriers() {
    let input = global_f32(&[32, 32]);
    let output = global_f32(&[32, 32]);

    let mut outer = Node::parallel([2, 2]);
    let mut inner = Node::parallel([16]);
    let tid = inner.induction_vars()[0].clone();

    let tile = Node::alloc(ScalarType::F32, vec![16, 16], MemorySpace::Shared);
    let tile_ref = tile.result().clone();
    inner.push(tile);

    let mut loop_node = Node::for_loop_unrolled(0, 16, 1);
    let iter = loop_node.induction_vars()[0].clone();

    let load = Node::load(input, AffineMap::identity(2), [iter.clone(), tid.clone()]);
    let loaded = load.result().clone();
    loop_node.push(load);
    loop_node.push(Node::store(loaded, tile_ref.clone(), AffineMap::identity(2), [iter.clone(), tid.clone()]));
    inner.push(loop_node);
    inner.push(Node::barrier());

    let reload = Node::plain_load(tile_ref, [tid.clone(), tid.clone()]);
    let reloaded = reload.result().clone();
    inner.push(reload);
    inner.push(Node::store(reloaded, output, AffineMap::identity(2), [tid.clone(), tid]));
    outer.push(inner);

    let source = generate(&module_of(vec![outer]), &ExtentDims).expect("generation failed");

    assert!(source.contains("// grid dims: (2, 2), block dims: (16,)"), "got:\n{source}");
    assert!(source.contains("  __shared__ float array0[16][16];"), "got:\n{source}");
    assert!(source.contains("  #pragma unroll\n  for (int iter0 = 0; iter0 < 16; iter0 += 1) {"), "got:\n{source}");
    assert!(source.contains("    auto R0 = arg0[iter0 * 32 + threadIdx.x + 0];"), "got:\n{source}");
    assert!(source.contains("    array0[iter0][threadIdx.x] = R0;"), "got:\n{source}");
    assert!(source.contains("  __syncthreads();"), "got:\n{source}");
    assert!(source.contains("  auto R1 = array0[threadIdx.x][threadIdx.x];"), "got:\n{source}");
    assert!(source.contains("  arg1[threadIdx.x * 32 + threadIdx.x + 0] = R1;"), "got:\n{source}");
}
