use anyhow::Result;
use minifb::{Key, Window, WindowOptions};
use opencv::core::{Mat, Point, Scalar, CV_8UC3};
use opencv::imgproc;
use opencv::prelude::*;
use std::thread;
use std::time::Duration;

use super::chart::ProgressChart;
use super::overlay::{KneeMarker, Overlay, OverlayLine, ISSUE_COLOR, WARNING_BACKGROUND};
use super::skeleton::{KEYPOINT_COLOR, LOW_VISIBILITY_COLOR, SKELETON_COLOR, SKELETON_CONNECTIONS};
use super::FrameDisplay;
use crate::analysis::validator::VISIBILITY_THRESHOLD;
use crate::pose::Pose;

/// 膝マーカーの半径（ピクセル）
const KNEE_MARKER_RADIUS: i32 = 10;

/// RGB (u32) → OpenCV の BGR Scalar
fn rgb_to_scalar(color: u32) -> Scalar {
    let r = ((color >> 16) & 0xFF) as f64;
    let g = ((color >> 8) & 0xFF) as f64;
    let b = (color & 0xFF) as f64;
    Scalar::new(b, g, r, 0.0)
}

fn put_text(img: &mut Mat, text: &str, origin: Point, scale: f64, color: u32) -> Result<()> {
    imgproc::put_text(
        img,
        text,
        origin,
        imgproc::FONT_HERSHEY_SIMPLEX,
        scale,
        rgb_to_scalar(color),
        2,
        imgproc::LINE_8,
        false,
    )?;
    Ok(())
}

/// minifbを使用したレンダラー
pub struct MinifbRenderer {
    window: Window,
    buffer: Vec<u32>,
    width: usize,
    height: usize,
}

impl MinifbRenderer {
    /// ウィンドウを作成
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let window = Window::new(
            title,
            width,
            height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;

        let buffer = vec![0u32; width * height];

        Ok(Self {
            window,
            buffer,
            width,
            height,
        })
    }

    /// ウィンドウが開いていて、Esc / Q が押されていないか
    pub fn is_open(&self) -> bool {
        self.window.is_open()
            && !self.window.is_key_down(Key::Escape)
            && !self.window.is_key_down(Key::Q)
    }

    /// BGR Mat をバッファにコピー
    pub fn draw_frame(&mut self, frame: &Mat) -> Result<()> {
        let frame_width = frame.cols() as usize;
        let frame_height = frame.rows() as usize;

        for y in 0..self.height.min(frame_height) {
            for x in 0..self.width.min(frame_width) {
                let pixel = frame.at_2d::<opencv::core::Vec3b>(y as i32, x as i32)?;
                let r = pixel[2] as u32;
                let g = pixel[1] as u32;
                let b = pixel[0] as u32;
                self.buffer[y * self.width + x] = (r << 16) | (g << 8) | b;
            }
        }

        Ok(())
    }

    /// 姿勢を描画
    pub fn draw_pose(&mut self, pose: &Pose) {
        let w = self.width as u32;
        let h = self.height as u32;

        for (start_idx, end_idx) in SKELETON_CONNECTIONS.iter() {
            let start = pose.get(*start_idx);
            let end = pose.get(*end_idx);

            if start.is_visible(VISIBILITY_THRESHOLD) && end.is_visible(VISIBILITY_THRESHOLD) {
                let (x1, y1) = start.to_pixel(w, h);
                let (x2, y2) = end.to_pixel(w, h);
                self.draw_line(x1, y1, x2, y2, SKELETON_COLOR);
            }
        }

        for kp in pose.keypoints.iter() {
            let (px, py) = kp.to_pixel(w, h);
            let color = if kp.is_visible(VISIBILITY_THRESHOLD) {
                KEYPOINT_COLOR
            } else {
                LOW_VISIBILITY_COLOR
            };
            self.draw_circle(px, py, 4, color);
        }
    }

    fn draw_knee_markers(&mut self, knees: &[KneeMarker; 2]) {
        for knee in knees {
            let (x, y) = knee.position;
            self.draw_ring(x, y, KNEE_MARKER_RADIUS, 2, knee.color());
        }
    }

    /// バッファをウィンドウに表示
    pub fn update(&mut self) -> Result<()> {
        self.window
            .update_with_buffer(&self.buffer, self.width, self.height)?;
        Ok(())
    }

    /// 進捗グラフをウィンドウが閉じられるまで表示
    pub fn show_chart(&mut self, chart: &ProgressChart) -> Result<()> {
        let canvas = render_chart(chart)?;
        self.draw_frame(&canvas)?;
        while self.is_open() {
            self.update()?;
            thread::sleep(Duration::from_millis(16));
        }
        Ok(())
    }

    /// Bresenhamのアルゴリズムで線を描画
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        let mut x = x0;
        let mut y = y0;

        loop {
            self.set_pixel(x, y, color);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// 円を描画（塗りつぶし）
    fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: u32) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// 輪を描画
    fn draw_ring(&mut self, cx: i32, cy: i32, radius: i32, thickness: i32, color: u32) {
        let inner = (radius - thickness).max(0);
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let d2 = dx * dx + dy * dy;
                if d2 <= radius * radius && d2 >= inner * inner {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// ピクセルをセット（境界チェック付き）
    fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.buffer[y as usize * self.width + x as usize] = color;
        }
    }
}

/// オーバーレイ文字を焼き込んだフレームを作る
fn compose_frame(frame: &Mat, overlay: &Overlay) -> Result<Mat> {
    let mut canvas = frame.try_clone()?;
    match overlay {
        Overlay::Warning(message) => {
            canvas.set_to(&rgb_to_scalar(WARNING_BACKGROUND), &opencv::core::no_array())?;
            let y = canvas.rows() / 2;
            put_text(&mut canvas, message, Point::new(10, y), 0.7, ISSUE_COLOR)?;
        }
        Overlay::Analysis { lines, .. } => {
            for (i, OverlayLine { text, color, scale }) in lines.iter().enumerate() {
                let y = 30 * (i as i32 + 1);
                put_text(&mut canvas, text, Point::new(10, y), *scale, *color)?;
            }
        }
    }
    Ok(canvas)
}

/// グラフを OpenCV の画像に描画
fn render_chart(chart: &ProgressChart) -> Result<Mat> {
    let mut canvas = Mat::new_rows_cols_with_default(
        chart.height,
        chart.width,
        CV_8UC3,
        Scalar::all(255.0),
    )?;
    let black = Scalar::all(0.0);
    let blue = rgb_to_scalar(0x0000FF);
    let grid = Scalar::all(220.0);
    let ((left, top), (right, bottom)) = chart.plot_area();

    put_text(&mut canvas, "Squat Form Progress Over Time", Point::new(left, top / 2), 0.7, 0x000000)?;

    // 目盛り (0, 25, 50, 75, 100)
    for step in 0..=4 {
        let y = bottom - (bottom - top) * step / 4;
        imgproc::line(&mut canvas, Point::new(left, y), Point::new(right, y), grid, 1, imgproc::LINE_8, 0)?;
        let label = format!("{}", step * 25);
        put_text(&mut canvas, &label, Point::new(10, y + 5), 0.4, 0x000000)?;
    }

    imgproc::line(&mut canvas, Point::new(left, top), Point::new(left, bottom), black, 2, imgproc::LINE_8, 0)?;
    imgproc::line(&mut canvas, Point::new(left, bottom), Point::new(right, bottom), black, 2, imgproc::LINE_8, 0)?;

    if chart.is_empty() {
        put_text(&mut canvas, "No progress data", Point::new(left + 10, (top + bottom) / 2), 0.7, 0x000000)?;
        return Ok(canvas);
    }

    for pair in chart.points.windows(2) {
        imgproc::line(
            &mut canvas,
            Point::new(pair[0].x, pair[0].y),
            Point::new(pair[1].x, pair[1].y),
            blue, 2, imgproc::LINE_8, 0,
        )?;
    }
    for p in &chart.points {
        imgproc::circle(&mut canvas, Point::new(p.x, p.y), 5, blue, -1, imgproc::LINE_8, 0)?;
    }

    // 両端のラベルだけ表示
    if let Some(first) = chart.points.first() {
        put_text(&mut canvas, &first.label, Point::new(left, bottom + 25), 0.4, 0x000000)?;
    }
    if chart.points.len() > 1 {
        if let Some(last) = chart.points.last() {
            put_text(&mut canvas, &last.label, Point::new(right - 150, bottom + 25), 0.4, 0x000000)?;
        }
    }

    Ok(canvas)
}

impl FrameDisplay<Mat> for MinifbRenderer {
    fn present(&mut self, image: &Mat, pose: Option<&Pose>, overlay: &Overlay) -> Result<()> {
        let composed = compose_frame(image, overlay)?;
        self.draw_frame(&composed)?;

        if let Overlay::Analysis { knees, .. } = overlay {
            if let Some(pose) = pose {
                self.draw_pose(pose);
            }
            self.draw_knee_markers(knees);
        }

        self.update()
    }

    fn quit_requested(&self) -> bool {
        !self.is_open()
    }
}
