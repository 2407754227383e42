//! End-to-end graph tests against the recording command backend.

use smallvec::smallvec;

use nori::cmd::recorder::{CommandRecorder, TraceCmd};
use nori::cmd::{
    BufferCopyRegion, BufferImageCopyRegion, ClearDepthStencilValue, ColorAttachment,
    DepthAttachment, ImageAspect, LoadOp, Rect2d, RenderingInfo, StoreOp, SubresourceLayers,
};
use nori::graph::nodes::copy_buffer::CopyBufferInfo;
use nori::graph::nodes::copy_buffer_to_image::CopyBufferToImageInfo;
use nori::graph::nodes::draw::DrawInfo;
use nori::graph::nodes::fill_buffer::FillBufferInfo;
use nori::graph::nodes::{ImageUse, ShaderResources};
use nori::graph::RenderGraph;
use nori::{Access, Buffer, Handle, Image, Pipeline};

fn rendering_target(image: Handle<Image>) -> RenderingInfo {
    RenderingInfo {
        area: Rect2d::default(),
        colors: smallvec![ColorAttachment {
            image,
            load: LoadOp::Clear,
            store: StoreOp::Store,
            clear: [0.0; 4],
        }],
        depth: None,
    }
}

fn draw(pipeline: Handle<Pipeline>) -> DrawInfo {
    DrawInfo {
        pipeline,
        vertex_buffer: None,
        vertex_count: 3,
        instance_count: 1,
        first_vertex: 0,
        first_instance: 0,
        resources: ShaderResources::default(),
    }
}

#[test]
fn rendering_scope_brackets_draws() {
    let target = Handle::<Image>::new(0, 0);
    let mut graph = RenderGraph::new();
    graph.add_begin_rendering(rendering_target(target));
    graph.add_draw(draw(Handle::new(1, 0)));
    graph.add_end_rendering();

    let mut recorder = CommandRecorder::new();
    graph.commit(&mut recorder);

    let begins = recorder
        .trace()
        .iter()
        .filter(|c| matches!(c, TraceCmd::BeginRendering(_)))
        .count();
    let ends = recorder
        .trace()
        .iter()
        .filter(|c| matches!(c, TraceCmd::EndRendering))
        .count();
    assert_eq!(begins, 1);
    assert_eq!(ends, 1);

    let begin_at = recorder
        .trace()
        .iter()
        .position(|c| matches!(c, TraceCmd::BeginRendering(_)))
        .unwrap();
    let draw_at = recorder
        .trace()
        .iter()
        .position(|c| matches!(c, TraceCmd::Draw { .. }))
        .unwrap();
    let end_at = recorder
        .trace()
        .iter()
        .position(|c| matches!(c, TraceCmd::EndRendering))
        .unwrap();
    assert!(begin_at < draw_at && draw_at < end_at);
}

#[test]
#[should_panic(expected = "outside a rendering scope")]
fn draw_outside_rendering_scope_panics() {
    let mut graph = RenderGraph::new();
    graph.add_draw(draw(Handle::new(1, 0)));

    let mut recorder = CommandRecorder::new();
    graph.commit(&mut recorder);
}

#[test]
fn back_to_back_writes_emit_barrier_between() {
    let buf = Handle::<Buffer>::new(3, 0);
    let mut graph = RenderGraph::new();
    graph.add_fill_buffer(FillBufferInfo { buffer: buf, offset: 0, size: 128, data: 0xaa });
    graph.add_fill_buffer(FillBufferInfo { buffer: buf, offset: 0, size: 128, data: 0xbb });

    let mut recorder = CommandRecorder::new();
    graph.commit(&mut recorder);

    let kinds: Vec<_> = recorder
        .trace()
        .iter()
        .map(|c| match c {
            TraceCmd::FillBuffer { .. } => "fill",
            TraceCmd::PipelineBarrier { .. } => "barrier",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, ["fill", "barrier", "fill"]);

    match &recorder.trace()[1] {
        TraceCmd::PipelineBarrier { buffers, images } => {
            assert_eq!(buffers.len(), 1);
            assert!(images.is_empty());
            assert_eq!(buffers[0].buffer, buf);
            assert_eq!(buffers[0].src, buffers[0].dst);
        }
        other => panic!("expected barrier, got {other:?}"),
    }
}

#[test]
fn read_after_write_barrier_carries_recorded_states() {
    let src = Handle::<Buffer>::new(1, 0);
    let dst = Handle::<Buffer>::new(2, 0);
    let mut graph = RenderGraph::new();
    graph.add_fill_buffer(FillBufferInfo { buffer: src, offset: 0, size: 64, data: 0 });
    graph.add_copy_buffer(CopyBufferInfo {
        src,
        dst,
        regions: smallvec![BufferCopyRegion { src_offset: 0, dst_offset: 0, size: 64 }],
    });

    let mut recorder = CommandRecorder::new();
    graph.commit(&mut recorder);

    let barrier = recorder
        .trace()
        .iter()
        .find_map(|c| match c {
            TraceCmd::PipelineBarrier { buffers, .. } => Some(buffers.clone()),
            _ => None,
        })
        .expect("missing barrier between write and read");
    assert_eq!(barrier.len(), 1);
    assert_eq!(barrier[0].buffer, src);
    assert_eq!(barrier[0].src.access, Access::TRANSFER_WRITE);
    assert_eq!(barrier[0].dst.access, Access::TRANSFER_READ);
}

#[test]
fn commit_is_deterministic() {
    let target = Handle::<Image>::new(0, 0);
    let buf = Handle::<Buffer>::new(3, 0);
    let mut graph = RenderGraph::new();
    graph.add_fill_buffer(FillBufferInfo { buffer: buf, offset: 0, size: 64, data: 1 });
    graph.add_begin_rendering(rendering_target(target));
    graph.add_draw(draw(Handle::new(1, 0)));
    graph.add_end_rendering();

    let mut first = CommandRecorder::new();
    let mut second = CommandRecorder::new();
    graph.commit(&mut first);
    graph.commit(&mut second);

    assert_eq!(first.trace(), second.trace());
}

#[test]
fn repeated_pipeline_binds_are_elided() {
    let target = Handle::<Image>::new(0, 0);
    let pipeline = Handle::<Pipeline>::new(1, 0);
    let mut graph = RenderGraph::new();
    graph.add_begin_rendering(rendering_target(target));
    graph.add_draw(draw(pipeline));
    graph.add_draw(draw(pipeline));
    graph.add_end_rendering();

    let mut recorder = CommandRecorder::new();
    graph.commit(&mut recorder);

    let binds = recorder
        .trace()
        .iter()
        .filter(|c| matches!(c, TraceCmd::BindGraphicsPipeline(_)))
        .count();
    let draws = recorder
        .trace()
        .iter()
        .filter(|c| matches!(c, TraceCmd::Draw { .. }))
        .count();
    assert_eq!(binds, 1);
    assert_eq!(draws, 2);
}

#[test]
fn pipeline_change_rebinds() {
    let target = Handle::<Image>::new(0, 0);
    let mut graph = RenderGraph::new();
    graph.add_begin_rendering(rendering_target(target));
    graph.add_draw(draw(Handle::new(1, 0)));
    graph.add_draw(draw(Handle::new(2, 0)));
    graph.add_draw(draw(Handle::new(1, 0)));
    graph.add_end_rendering();

    let mut recorder = CommandRecorder::new();
    graph.commit(&mut recorder);

    let binds = recorder
        .trace()
        .iter()
        .filter(|c| matches!(c, TraceCmd::BindGraphicsPipeline(_)))
        .count();
    assert_eq!(binds, 3);
}

#[test]
fn scoped_barriers_land_before_begin_rendering() {
    let target = Handle::<Image>::new(0, 0);
    let tex = Handle::<Image>::new(5, 0);
    let mut graph = RenderGraph::new();
    graph.add_copy_buffer_to_image(CopyBufferToImageInfo {
        src: Handle::<Buffer>::new(1, 0),
        dst: tex,
        regions: smallvec![BufferImageCopyRegion {
            subresource: SubresourceLayers {
                aspect: ImageAspect::COLOR,
                mip_level: 0,
                base_layer: 0,
                layer_count: 1,
            },
            ..Default::default()
        }],
    });
    let mut sampled = draw(Handle::new(2, 0));
    sampled.resources.images.push(ImageUse {
        image: tex,
        access: Access::SHADER_READ,
        layout: nori::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
        aspect: ImageAspect::COLOR,
    });
    graph.add_begin_rendering(rendering_target(target));
    graph.add_draw(sampled);
    graph.add_end_rendering();

    let mut recorder = CommandRecorder::new();
    graph.commit(&mut recorder);

    let begin_at = recorder
        .trace()
        .iter()
        .position(|c| matches!(c, TraceCmd::BeginRendering(_)))
        .unwrap();
    let end_at = recorder
        .trace()
        .iter()
        .position(|c| matches!(c, TraceCmd::EndRendering))
        .unwrap();
    // Barriers are illegal inside a rendering instance; the draw's sampled
    // read must be covered before the scope opens.
    assert!(recorder.trace()[begin_at..end_at]
        .iter()
        .all(|c| !matches!(c, TraceCmd::PipelineBarrier { .. })));
    let hoisted = recorder.trace()[..begin_at].iter().any(|c| match c {
        TraceCmd::PipelineBarrier { images, .. } => images.iter().any(|b| {
            b.image == tex && b.dst.layout == nori::ImageLayout::SHADER_READ_ONLY_OPTIMAL
        }),
        _ => false,
    });
    assert!(hoisted, "sampled-image transition missing ahead of the scope");
}

#[test]
fn depth_only_attachment_barrier_keeps_depth_aspect() {
    let depth_image = Handle::<Image>::new(7, 0);
    let mut info = rendering_target(Handle::new(0, 0));
    info.depth = Some(DepthAttachment {
        image: depth_image,
        load: LoadOp::Clear,
        store: StoreOp::Store,
        clear: ClearDepthStencilValue { depth: 1.0, stencil: 0 },
        aspect: ImageAspect::DEPTH,
    });
    let mut graph = RenderGraph::new();
    graph.add_begin_rendering(info);
    graph.add_end_rendering();

    let mut recorder = CommandRecorder::new();
    graph.commit(&mut recorder);

    let range = recorder
        .trace()
        .iter()
        .find_map(|c| match c {
            TraceCmd::PipelineBarrier { images, .. } => {
                images.iter().find(|b| b.image == depth_image).map(|b| b.range)
            }
            _ => None,
        })
        .expect("missing depth attachment transition");
    // A depth-only format has no stencil aspect to transition.
    assert_eq!(range.aspect, ImageAspect::DEPTH);
}

#[test]
fn first_image_use_transitions_from_undefined() {
    let target = Handle::<Image>::new(0, 0);
    let mut graph = RenderGraph::new();
    graph.add_begin_rendering(rendering_target(target));
    graph.add_end_rendering();

    let mut recorder = CommandRecorder::new();
    graph.commit(&mut recorder);

    match &recorder.trace()[0] {
        TraceCmd::PipelineBarrier { buffers, images } => {
            assert!(buffers.is_empty());
            assert_eq!(images.len(), 1);
            assert_eq!(images[0].image, target);
            assert_eq!(images[0].src.layout, nori::ImageLayout::UNDEFINED);
            assert_eq!(images[0].dst.layout, nori::ImageLayout::COLOR_ATTACHMENT_OPTIMAL);
        }
        other => panic!("expected layout transition first, got {other:?}"),
    }
}
