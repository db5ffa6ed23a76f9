// Layout system - 뷰 스택 레이아웃
//
// 화면 구성: 뷰 영역 | 상태바 | 커맨드바
// 뷰들은 저장된 위치에서 위아래로 쌓이고, 가장 넓은 뷰가 전체 폭을 정한다.

use crate::models::WindowPosition;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// 최소 터미널 크기 상수
pub const MIN_WIDTH: u16 = 40;
pub const MIN_HEIGHT: u16 = 10;

/// 레이아웃 모드
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    Normal,
    /// 경고 모드 (터미널이 너무 작음)
    TooSmall,
}

/// 레이아웃 영역
#[derive(Debug, Clone, Default)]
pub struct LayoutAreas {
    /// 뷰 스택이 놓이는 영역
    pub views: Rect,
    pub status_bar: Rect,
    pub command_bar: Rect,
    /// 경고 메시지 영역 (TooSmall 모드에서 사용)
    pub warning: Rect,
}

#[derive(Debug)]
pub struct LayoutManager {
    mode: LayoutMode,
    terminal_size: (u16, u16),
    areas: LayoutAreas,
}

impl Default for LayoutManager {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutManager {
    pub fn new() -> Self {
        Self {
            mode: LayoutMode::Normal,
            terminal_size: (80, 24),
            areas: LayoutAreas::default(),
        }
    }

    fn determine_mode(width: u16, height: u16) -> LayoutMode {
        if width < MIN_WIDTH || height < MIN_HEIGHT {
            LayoutMode::TooSmall
        } else {
            LayoutMode::Normal
        }
    }

    /// 터미널 크기 업데이트 및 레이아웃 재계산
    pub fn update(&mut self, area: Rect) {
        self.terminal_size = (area.width, area.height);
        self.mode = Self::determine_mode(area.width, area.height);
        self.areas = match self.mode {
            LayoutMode::TooSmall => LayoutAreas {
                warning: area,
                ..Default::default()
            },
            LayoutMode::Normal => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Min(3),    // 뷰 영역
                        Constraint::Length(1), // 상태바
                        Constraint::Length(1), // 커맨드바
                    ])
                    .split(area);
                LayoutAreas {
                    views: chunks[0],
                    status_bar: chunks[1],
                    command_bar: chunks[2],
                    warning: Rect::default(),
                }
            }
        };
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn areas(&self) -> &LayoutAreas {
        &self.areas
    }

    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }
}

/// 뷰 스택 배치
///
/// `sizes`는 각 뷰의 (선호 폭, 높이). 모든 뷰는 가장 넓은 폭으로 맞춘다.
/// 스택이 영역을 벗어나지 않도록 위치를 당기고, 그래도 남는 뷰는 높이 0.
pub fn stack_view_areas(region: Rect, position: WindowPosition, sizes: &[(u16, u16)]) -> Vec<Rect> {
    let width = sizes
        .iter()
        .map(|(w, _)| *w)
        .max()
        .unwrap_or(0)
        .min(region.width);
    let total_height: u16 = sizes.iter().fold(0u16, |acc, (_, h)| acc.saturating_add(*h));

    let x = region.x + position.x.min(region.width.saturating_sub(width));
    let mut y = region.y + position.y.min(region.height.saturating_sub(total_height));
    let bottom = region.y + region.height;

    sizes
        .iter()
        .map(|(_, height)| {
            let available = bottom.saturating_sub(y);
            let h = (*height).min(available);
            let rect = Rect {
                x,
                y,
                width,
                height: h,
            };
            y = y.saturating_add(h);
            rect
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determine_mode() {
        assert_eq!(LayoutManager::determine_mode(80, 24), LayoutMode::Normal);
        assert_eq!(LayoutManager::determine_mode(40, 10), LayoutMode::Normal);
        assert_eq!(LayoutManager::determine_mode(39, 24), LayoutMode::TooSmall);
        assert_eq!(LayoutManager::determine_mode(80, 9), LayoutMode::TooSmall);
    }

    #[test]
    fn test_update_splits_bars() {
        let mut manager = LayoutManager::new();
        manager.update(Rect::new(0, 0, 80, 24));

        let areas = manager.areas();
        assert_eq!(areas.views, Rect::new(0, 0, 80, 22));
        assert_eq!(areas.status_bar, Rect::new(0, 22, 80, 1));
        assert_eq!(areas.command_bar, Rect::new(0, 23, 80, 1));
        assert_eq!(manager.terminal_size(), (80, 24));
    }

    #[test]
    fn test_stack_uses_widest_view() {
        let region = Rect::new(0, 0, 80, 22);
        let rects = stack_view_areas(region, WindowPosition { x: 2, y: 1 }, &[(40, 8), (50, 6)]);

        assert_eq!(rects[0], Rect::new(2, 1, 50, 8));
        assert_eq!(rects[1], Rect::new(2, 9, 50, 6));
    }

    #[test]
    fn test_stack_pulled_back_inside_region() {
        let region = Rect::new(0, 0, 60, 20);
        let rects = stack_view_areas(region, WindowPosition { x: 100, y: 100 }, &[(50, 6), (50, 6)]);

        assert_eq!(rects[0], Rect::new(10, 8, 50, 6));
        assert_eq!(rects[1], Rect::new(10, 14, 50, 6));
    }

    #[test]
    fn test_stack_overflow_clips_last_views() {
        let region = Rect::new(0, 0, 60, 10);
        let rects = stack_view_areas(region, WindowPosition { x: 0, y: 0 }, &[(50, 6), (50, 6), (50, 6)]);

        assert_eq!(rects[0].height, 6);
        assert_eq!(rects[1].height, 4);
        assert_eq!(rects[2].height, 0);
    }
}
